//! Key validation and lifecycle state machine.
//!
//! Every operation takes a connection checked out by the caller. Nothing here
//! knows about HTTP; handlers and the CLI are thin wrappers.
//!
//! HWID policy is bind-once: a key's HWID is recorded on the first successful
//! validation (or explicit `initialize`) that supplies one, and after that only
//! `reset_hwid` can change it.

use chrono::Utc;
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{
    AuthSuccess, CreateLicense, IssueLicense, LicenseKey, LicenseStatus, LogAction,
};
use crate::util::{SECONDS_PER_DAY, days_left, utc_day_bounds};

pub const INVALID_KEY_MESSAGE: &str = "Invalid/expired key";
pub const HWID_MISMATCH_MESSAGE: &str = "HWID mismatch";
pub const ALREADY_INITIALIZED_MESSAGE: &str = "Key invalid or already initialized";

/// Longest accepted owner label
pub const MAX_OWNER_LEN: usize = 32;

/// Longest accepted duration (100 years)
pub const MAX_DURATION_DAYS: i64 = 36_500;

/// Short, log-safe prefix of a key.
fn key_hint(key: &str) -> &str {
    match key.char_indices().nth(8) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}

/// Validate one authentication attempt.
///
/// Runs as a single IMMEDIATE transaction: the lookup, the attempt log and the
/// last-seen/HWID update commit together, so concurrent first-use calls for
/// the same key cannot both bind different HWIDs. Exactly one log row is
/// written per call; if storage is unavailable nothing is written.
pub fn validate(conn: &mut Connection, key: &str, hwid: &str, ip: &str) -> Result<AuthSuccess> {
    let now = Utc::now().timestamp();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let license = match queries::get_license_by_key(&tx, key)? {
        Some(l) if l.status == LicenseStatus::Active && !l.is_time_expired(now) => l,
        _ => {
            queries::append_log(&tx, key, ip, hwid, LogAction::AuthFailed, now)?;
            tx.commit()?;
            tracing::warn!(key = key_hint(key), ip, "Auth failed: invalid or expired key");
            return Err(AppError::Unauthorized(INVALID_KEY_MESSAGE.into()));
        }
    };

    if license.hwid_locked && license.is_bound() && license.bound_hwid != hwid {
        queries::append_log(&tx, key, ip, hwid, LogAction::HwidMismatch, now)?;
        tx.commit()?;
        tracing::warn!(key = key_hint(key), ip, "Auth failed: HWID mismatch");
        return Err(AppError::Unauthorized(HWID_MISMATCH_MESSAGE.into()));
    }

    queries::record_successful_auth(&tx, key, hwid, ip, now)?;
    queries::append_log(&tx, key, ip, hwid, LogAction::AuthSuccess, now)?;

    let (day_start, day_end) = utc_day_bounds(now);
    let usage_today = queries::count_logs_between(&tx, key, day_start, day_end)?;

    tx.commit()?;

    let bound_hwid = if license.is_bound() {
        license.bound_hwid
    } else {
        if !hwid.is_empty() {
            tracing::info!(key = key_hint(key), "HWID bound on first use");
        }
        hwid.to_string()
    };

    Ok(AuthSuccess {
        key: license.key,
        owner: license.owner,
        days_left: days_left(license.expires_at, now),
        hwid_locked: license.hwid_locked,
        hwid: bound_hwid,
        ip: ip.to_string(),
        features: license.features,
        usage_today,
    })
}

/// One-shot HWID claim for an existing, unbound key.
///
/// Fails with `InvalidState` if the key is unknown, already bound, or `hwid`
/// is empty. Does not log an attempt.
pub fn initialize(conn: &Connection, key: &str, hwid: &str, ip: &str) -> Result<()> {
    if hwid.is_empty() {
        return Err(AppError::InvalidState("HWID must not be empty".into()));
    }

    if !queries::try_bind_hwid(conn, key, hwid, ip)? {
        return Err(AppError::InvalidState(ALREADY_INITIALIZED_MESSAGE.into()));
    }

    tracing::info!(key = key_hint(key), ip, "HWID registered");
    Ok(())
}

/// Issue a new active key.
pub fn issue(conn: &Connection, input: &IssueLicense) -> Result<LicenseKey> {
    let owner = input.owner.trim();
    if owner.is_empty() {
        return Err(AppError::BadRequest("owner must not be empty".into()));
    }
    if owner.chars().count() > MAX_OWNER_LEN {
        return Err(AppError::BadRequest(format!(
            "owner must be at most {} characters",
            MAX_OWNER_LEN
        )));
    }

    let expires_at = match input.duration_days {
        Some(days) if !(1..=MAX_DURATION_DAYS).contains(&days) => {
            return Err(AppError::BadRequest(format!(
                "duration must be between 1 and {} days",
                MAX_DURATION_DAYS
            )));
        }
        Some(days) => Some(Utc::now().timestamp() + days * SECONDS_PER_DAY),
        None => None,
    };

    // Features are a set: trim, drop blanks, keep first occurrence
    let mut features: Vec<String> = Vec::with_capacity(input.features.len());
    for tag in input.features.iter().map(|f| f.trim()) {
        if !tag.is_empty() && !features.iter().any(|f| f == tag) {
            features.push(tag.to_string());
        }
    }

    let license = queries::create_license(
        conn,
        &CreateLicense {
            owner: owner.to_string(),
            expires_at,
            hwid_locked: input.hwid_locked,
            features,
        },
    )?;

    tracing::info!(
        key = key_hint(&license.key),
        owner = %license.owner,
        hwid_locked = license.hwid_locked,
        "License issued"
    );
    Ok(license)
}

fn set_status(conn: &Connection, key: &str, status: LicenseStatus) -> Result<()> {
    if !queries::set_license_status(conn, key, status)? {
        return Err(AppError::NotFound("License key not found".into()));
    }
    tracing::info!(key = key_hint(key), status = status.as_ref(), "License status changed");
    Ok(())
}

/// Soft-delete a key (`status = deleted`). Unknown keys are `NotFound`.
pub fn revoke(conn: &Connection, key: &str) -> Result<()> {
    set_status(conn, key, LicenseStatus::Deleted)
}

/// Ban a key (`status = banned`). Unknown keys are `NotFound`.
pub fn ban(conn: &Connection, key: &str) -> Result<()> {
    set_status(conn, key, LicenseStatus::Banned)
}

/// Mark a key as administratively expired (`status = expired`).
pub fn expire(conn: &Connection, key: &str) -> Result<()> {
    set_status(conn, key, LicenseStatus::Expired)
}

/// Clear the bound HWID so the next validation or `initialize` can bind again.
pub fn reset_hwid(conn: &Connection, key: &str) -> Result<()> {
    if !queries::clear_bound_hwid(conn, key)? {
        return Err(AppError::NotFound("License key not found".into()));
    }
    tracing::info!(key = key_hint(key), "HWID binding reset");
    Ok(())
}
