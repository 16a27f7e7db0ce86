// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use cmdrelay_core::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Pool size shared by the registry, the execution log and the token store
const MAX_CONNECTIONS: u32 = 10;

/// Writers wait this long for the database lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create SQLite connection pool with WAL mode.
///
/// Accepts a file path, a `sqlite:` URL or `sqlite::memory:`.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(map_sqlx_error)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_pool_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.db");

        let pool = create_pool(path.to_str().unwrap()).await.unwrap();
        assert!(pool.acquire().await.is_ok());
        assert!(path.exists());
    }
}
