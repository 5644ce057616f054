use chrono::Utc;
use rusqlite::{Connection, params};

use crate::error::Result;
use crate::id::EntityType;
use crate::keygen::generate_key;
use crate::models::*;

use super::from_row::{LICENSE_COLS, LOG_COLS, query_all, query_one};

const SECONDS_PER_DAY: f64 = 86400.0;

fn now() -> i64 {
    Utc::now().timestamp()
}

// ============ Licenses ============

/// Insert a new active, unbound license with a freshly generated key.
pub fn create_license(conn: &Connection, input: &CreateLicense) -> Result<LicenseKey> {
    let key = generate_key();
    let created_at = now();
    let features = serde_json::to_string(&input.features)?;

    conn.execute(
        "INSERT INTO licenses (key, owner, expires_at, hwid_locked, bound_hwid, features, status, created_at)
         VALUES (?1, ?2, ?3, ?4, '', ?5, ?6, ?7)",
        params![
            &key,
            &input.owner,
            input.expires_at,
            input.hwid_locked as i32,
            &features,
            LicenseStatus::Active.as_ref(),
            created_at
        ],
    )?;

    Ok(LicenseKey {
        key,
        owner: input.owner.clone(),
        expires_at: input.expires_at,
        hwid_locked: input.hwid_locked,
        bound_hwid: String::new(),
        last_ip: None,
        last_seen_at: None,
        features: input.features.clone(),
        status: LicenseStatus::Active,
        created_at,
    })
}

pub fn get_license_by_key(conn: &Connection, key: &str) -> Result<Option<LicenseKey>> {
    query_one(
        conn,
        &format!("SELECT {} FROM licenses WHERE key = ?1", LICENSE_COLS),
        &[&key],
    )
}

/// Most recently issued first. Ties (same second) fall back to insertion order.
pub fn list_licenses(conn: &Connection, limit: i64) -> Result<Vec<LicenseKey>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM licenses ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            LICENSE_COLS
        ),
        &[&limit],
    )
}

/// Overwrite the status column. Returns false if the key does not exist.
pub fn set_license_status(conn: &Connection, key: &str, status: LicenseStatus) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE licenses SET status = ?1 WHERE key = ?2",
        params![status.as_ref(), key],
    )?;
    Ok(affected > 0)
}

/// Stamp a successful validation: last seen, last IP, and bind the HWID
/// only if none is bound yet.
pub fn record_successful_auth(
    conn: &Connection,
    key: &str,
    hwid: &str,
    ip: &str,
    at: i64,
) -> Result<()> {
    conn.execute(
        "UPDATE licenses
         SET last_seen_at = ?1,
             last_ip = ?2,
             bound_hwid = CASE WHEN bound_hwid = '' THEN ?3 ELSE bound_hwid END
         WHERE key = ?4",
        params![at, ip, hwid, key],
    )?;
    Ok(())
}

/// Atomically claim an unbound key for `hwid`.
///
/// The UPDATE only matches when the key exists and nothing is bound yet, so
/// two concurrent claims can never both succeed.
pub fn try_bind_hwid(conn: &Connection, key: &str, hwid: &str, ip: &str) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE licenses SET bound_hwid = ?1, last_ip = ?2 WHERE key = ?3 AND bound_hwid = ''",
        params![hwid, ip, key],
    )?;
    Ok(affected > 0)
}

/// Clear the bound HWID. Returns false if the key does not exist.
pub fn clear_bound_hwid(conn: &Connection, key: &str) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE licenses SET bound_hwid = '' WHERE key = ?1",
        params![key],
    )?;
    Ok(affected > 0)
}

pub fn count_licenses_with_status(conn: &Connection, status: LicenseStatus) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM licenses WHERE status = ?1",
        params![status.as_ref()],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

pub fn count_hwid_locked_active(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM licenses WHERE status = ?1 AND hwid_locked = 1",
        params![LicenseStatus::Active.as_ref()],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Mean remaining days over active keys that have an expiry still in the future.
/// None when there are no such keys.
pub fn avg_days_left(conn: &Connection, at: i64) -> Result<Option<f64>> {
    let avg_seconds: Option<f64> = conn.query_row(
        "SELECT AVG(CAST(expires_at - ?1 AS REAL)) FROM licenses
         WHERE status = ?2 AND expires_at IS NOT NULL AND expires_at > ?1",
        params![at, LicenseStatus::Active.as_ref()],
        |row| row.get(0),
    )?;
    Ok(avg_seconds.map(|s| s / SECONDS_PER_DAY))
}

// ============ Event Log ============

/// Append one validation attempt.
pub fn append_log(
    conn: &Connection,
    key: &str,
    ip: &str,
    hwid: &str,
    action: LogAction,
    at: i64,
) -> Result<LogEntry> {
    let id = EntityType::LogEntry.gen_id();

    conn.execute(
        "INSERT INTO logs (id, key, ip, hwid, action, timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, key, ip, hwid, action.as_ref(), at],
    )?;

    Ok(LogEntry {
        id,
        key: key.to_string(),
        ip: ip.to_string(),
        hwid: hwid.to_string(),
        action,
        timestamp: at,
    })
}

/// Count attempts for `key` with `from <= timestamp < to`.
pub fn count_logs_between(conn: &Connection, key: &str, from: i64, to: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM logs WHERE key = ?1 AND timestamp >= ?2 AND timestamp < ?3",
        params![key, from, to],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Newest first.
pub fn list_logs_for_key(conn: &Connection, key: &str, limit: i64) -> Result<Vec<LogEntry>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM logs WHERE key = ?1 ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
            LOG_COLS
        ),
        &[&key, &limit],
    )
}
