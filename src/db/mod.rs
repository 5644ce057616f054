mod from_row;
pub mod migrations;
pub mod queries;
mod schema;

pub use schema::init_db;

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared by every handler.
///
/// Handlers check a connection out of `db` per request and hand it to the
/// core operations; the pooled connection goes back on drop.
#[derive(Clone)]
pub struct AppState {
    /// License store and event log
    pub db: DbPool,
}

/// Create a file-backed pool. Every connection waits up to `busy_timeout`
/// on a locked database before the call surfaces as `Unavailable`.
pub fn create_pool(
    database_path: &str,
    max_size: u32,
    busy_timeout: Duration,
) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path).with_init(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        Ok(())
    });
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(busy_timeout.max(Duration::from_secs(1)))
        .build(manager)
}
