//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to rusqlite errors
/// instead of panicking on unexpected values.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const LICENSE_COLS: &str = "key, owner, expires_at, hwid_locked, bound_hwid, last_ip, last_seen_at, features, status, created_at";

pub const LOG_COLS: &str = "id, key, ip, hwid, action, timestamp";

// ============ FromRow Implementations ============

impl FromRow for LicenseKey {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let features_str: String = row.get(7)?;
        Ok(LicenseKey {
            key: row.get(0)?,
            owner: row.get(1)?,
            expires_at: row.get(2)?,
            hwid_locked: row.get::<_, i32>(3)? != 0,
            bound_hwid: row.get(4)?,
            last_ip: row.get(5)?,
            last_seen_at: row.get(6)?,
            features: serde_json::from_str(&features_str).unwrap_or_default(),
            status: parse_enum(row, 8, "status")?,
            created_at: row.get(9)?,
        })
    }
}

impl FromRow for LogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(LogEntry {
            id: row.get(0)?,
            key: row.get(1)?,
            ip: row.get(2)?,
            hwid: row.get(3)?,
            action: parse_enum(row, 4, "action")?,
            timestamp: row.get(5)?,
        })
    }
}
