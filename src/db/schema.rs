use rusqlite::Connection;

/// One schema version. `sql` runs inside the upgrade transaction.
pub struct SchemaVersion {
    pub version: i32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// Every schema version in order. Append only; never edit a shipped entry.
pub const SCHEMA_VERSIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: 1,
        description: "licenses and logs",
        sql: r#"
        -- Issued license keys. Rows are never deleted: banned/deleted are soft states.
        -- bound_hwid = '' until the first bind (validation or explicit init).
        CREATE TABLE IF NOT EXISTS licenses (
            key TEXT PRIMARY KEY,
            owner TEXT NOT NULL,
            expires_at INTEGER,
            hwid_locked INTEGER NOT NULL DEFAULT 0,
            bound_hwid TEXT NOT NULL DEFAULT '',
            last_ip TEXT,
            last_seen_at INTEGER,
            features TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'expired', 'banned', 'deleted')),
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_licenses_created ON licenses(created_at);

        -- Validation attempts (append-only)
        CREATE TABLE IF NOT EXISTS logs (
            id TEXT PRIMARY KEY,
            key TEXT NOT NULL,
            ip TEXT NOT NULL,
            hwid TEXT NOT NULL DEFAULT '',
            action TEXT NOT NULL CHECK (action IN ('auth_failed', 'hwid_mismatch', 'auth_success')),
            timestamp INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_logs_key_timestamp ON logs(key, timestamp);
        "#,
    },
    SchemaVersion {
        version: 2,
        description: "status index for dashboard counts",
        sql: "CREATE INDEX IF NOT EXISTS idx_licenses_status ON licenses(status);",
    },
];

/// Latest schema version this build knows about.
pub fn latest_version() -> i32 {
    SCHEMA_VERSIONS.last().map_or(0, |v| v.version)
}

/// Current schema version, tracked in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Bring the schema up to date, one transaction per version.
///
/// Returns the number of versions applied. Safe to call on every start.
pub fn init_db(conn: &Connection) -> rusqlite::Result<usize> {
    let current = schema_version(conn)?;
    let mut applied = 0;

    for step in SCHEMA_VERSIONS.iter().filter(|v| v.version > current) {
        tracing::info!("Applying schema v{}: {}", step.version, step.description);

        // Rolls back on drop if any statement fails
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        tx.commit()?;
        applied += 1;
    }

    Ok(applied)
}
