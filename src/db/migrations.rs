//! Startup upgrade of a file-backed database.
//!
//! The versioned DDL lives in `schema`; this module wraps it with a file copy
//! taken before any pending version is applied, and prunes old copies.
//! Copies are named `<db>.backup_v<from>_<YYYYmmdd_HHMMSS>`.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

use super::schema::{init_db, latest_version, schema_version};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Could not copy database to {path}: {source}")]
    BackupFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Schema upgrade from v{from} failed: {source}. Backup: {backup}")]
    UpgradeFailed {
        from: i32,
        backup: String,
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

fn backup_prefix(db_path: &Path) -> String {
    let name = db_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    format!("{}.backup_v", name)
}

fn copy_database(db_path: &Path, from_version: i32) -> Result<PathBuf, MigrationError> {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let target = PathBuf::from(format!(
        "{}{}_{}",
        db_path.with_file_name(backup_prefix(db_path)).display(),
        from_version,
        stamp
    ));

    fs::copy(db_path, &target).map_err(|source| MigrationError::BackupFailed {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

/// Delete all but the newest `keep` copies of `db_path`. `keep < 1` deletes nothing.
///
/// Names carry a sortable timestamp, so lexical order is age order.
pub fn prune_backups(db_path: &str, keep: i32) -> std::io::Result<usize> {
    if keep < 1 {
        return Ok(0);
    }

    let db_path = Path::new(db_path);
    let dir = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let prefix = backup_prefix(db_path);

    let mut copies: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();
    copies.sort();

    let excess = copies.len().saturating_sub(keep as usize);
    for path in &copies[..excess] {
        tracing::info!("Removing old backup {}", path.display());
        fs::remove_file(path)?;
    }
    Ok(excess)
}

/// Upgrade the schema of the database at `db_path`.
///
/// A copy is taken first unless the database is fresh (v0) or `backup_keep`
/// is 0; -1 keeps every copy. Returns the number of versions applied.
pub fn run_migrations(
    conn: &Connection,
    db_path: &str,
    backup_keep: i32,
) -> Result<usize, MigrationError> {
    let from = schema_version(conn)?;
    if from >= latest_version() {
        tracing::debug!("Schema at v{} (up to date)", from);
        return Ok(0);
    }

    let backup = if from == 0 || backup_keep == 0 {
        None
    } else {
        let path = copy_database(Path::new(db_path), from)?;
        tracing::info!("Backup created: {}", path.display());
        Some(path)
    };

    let applied = init_db(conn).map_err(|source| {
        let backup = backup
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());
        tracing::error!("Schema upgrade from v{} failed: {}", from, source);
        MigrationError::UpgradeFailed {
            from,
            backup,
            source,
        }
    })?;

    if let Err(e) = prune_backups(db_path, backup_keep) {
        tracing::warn!("Failed to prune old backups: {}", e);
    }

    Ok(applied)
}
