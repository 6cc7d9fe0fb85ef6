//! SQLite pool setup.
//!
//! All stores share one pool; tables are created by each store on
//! construction with `CREATE TABLE IF NOT EXISTS`, so opening a pool
//! against a fresh file is enough to bootstrap the service.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open or create a database at the given path.
pub async fn open_pool(path: impl AsRef<Path>) -> Result<SqlitePool, sqlx::Error> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            sqlx::Error::Configuration(format!("Failed to create db directory: {}", e).into())
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        // WAL mode for better concurrent read performance
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        // NORMAL sync balances durability vs speed
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1) // SQLite performs best with single writer
        .connect_with(options)
        .await
}
