//! Read-only dashboard queries over the license store and event log.

use chrono::Utc;
use rusqlite::Connection;

use crate::db::queries;
use crate::error::Result;
use crate::models::{KeyView, LicenseStatus, LogEntry, Stats};
use crate::pagination::PaginationQuery;
use crate::util::{remaining_label, round1};

/// Page size cap for the key listing
pub const MAX_KEYS_PAGE: i64 = 50;

/// Page size cap for the per-key log listing
pub const MAX_LOGS_PAGE: i64 = 100;

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let now = Utc::now().timestamp();

    let active_keys = queries::count_licenses_with_status(conn, LicenseStatus::Active)?;
    let expired_keys = queries::count_licenses_with_status(conn, LicenseStatus::Expired)?;
    let banned_keys = queries::count_licenses_with_status(conn, LicenseStatus::Banned)?;
    let deleted_keys = queries::count_licenses_with_status(conn, LicenseStatus::Deleted)?;

    let avg_days_left = queries::avg_days_left(conn, now)?
        .map(round1)
        .unwrap_or(0.0);

    let hwid_locked_pct = if active_keys > 0 {
        let locked = queries::count_hwid_locked_active(conn)?;
        round1(locked as f64 / active_keys as f64 * 100.0)
    } else {
        0.0
    };

    Ok(Stats {
        total_keys: active_keys + expired_keys + banned_keys,
        active_keys,
        expired_keys,
        banned_keys,
        deleted_keys,
        avg_days_left,
        hwid_locked_pct,
    })
}

/// Most recently issued keys first, at most `MAX_KEYS_PAGE`.
pub fn list_keys(conn: &Connection, limit: Option<i64>) -> Result<Vec<KeyView>> {
    let now = Utc::now().timestamp();
    let limit = PaginationQuery::with_limit(limit).limit(MAX_KEYS_PAGE);

    let keys = queries::list_licenses(conn, limit)?
        .into_iter()
        .map(|l| KeyView {
            days_left: remaining_label(l.expires_at, now),
            key: l.key,
            owner: l.owner,
            hwid_locked: l.hwid_locked,
            hwid: l.bound_hwid,
            ip: l.last_ip,
            last_seen_at: l.last_seen_at,
            status: l.status,
            created_at: l.created_at,
        })
        .collect();

    Ok(keys)
}

/// Most recent attempts for one key, newest first.
pub fn list_logs(conn: &Connection, key: &str, limit: Option<i64>) -> Result<Vec<LogEntry>> {
    let limit = PaginationQuery::with_limit(limit).limit(MAX_LOGS_PAGE);
    queries::list_logs_for_key(conn, key, limit)
}
