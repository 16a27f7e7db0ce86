// SQLite CommandRegistry Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use cmdrelay_core::domain::CommandEntry;
use cmdrelay_core::error::Result;
use cmdrelay_core::port::{CommandRegistry, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteCommandRegistry {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteCommandRegistry {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl CommandRegistry for SqliteCommandRegistry {
    async fn upsert(&self, entry: &CommandEntry) -> Result<()> {
        let now = self.time_provider.now_millis();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // ON CONFLICT ... DO UPDATE keeps the row id (unlike INSERT OR REPLACE),
        // so an overwritten entry keeps its listing position
        sqlx::query(
            r#"
            INSERT INTO commands (name, command, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE
            SET command = excluded.command, updated_at = excluded.updated_at
            "#,
        )
        .bind(&entry.name)
        .bind(&entry.shell_command)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT command FROM commands WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_all(&self) -> Result<Vec<CommandEntry>> {
        let rows: Vec<CommandRow> =
            sqlx::query_as("SELECT name, command FROM commands ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommandRow::into_entry).collect())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct CommandRow {
    name: String,
    command: String,
}

impl CommandRow {
    fn into_entry(self) -> CommandEntry {
        // Rows are only written from validated entries
        CommandEntry {
            name: self.name,
            shell_command: self.command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use cmdrelay_core::port::time_provider::mocks::FixedTimeProvider;

    async fn registry() -> (SqliteCommandRegistry, SqlitePool, Arc<FixedTimeProvider>) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let clock = Arc::new(FixedTimeProvider::new(1_000));
        (
            SqliteCommandRegistry::new(pool.clone(), clock.clone()),
            pool,
            clock,
        )
    }

    fn entry(name: &str, command: &str) -> CommandEntry {
        CommandEntry::new(name, command).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_lookup() {
        let (registry, _, _) = registry().await;
        registry.upsert(&entry("ping", "echo pong")).await.unwrap();

        assert_eq!(
            registry.lookup("ping").await.unwrap().as_deref(),
            Some("echo pong")
        );
        assert_eq!(registry.lookup("pong").await.unwrap(), None);
        assert_eq!(registry.lookup("PING").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_in_place() {
        let (registry, pool, clock) = registry().await;
        registry.upsert(&entry("a", "echo 1")).await.unwrap();
        registry.upsert(&entry("b", "echo 2")).await.unwrap();
        clock.advance(500);
        registry.upsert(&entry("a", "echo 3")).await.unwrap();

        let all = registry.list_all().await.unwrap();
        assert_eq!(all, vec![entry("a", "echo 3"), entry("b", "echo 2")]);

        let (created, updated): (i64, i64) =
            sqlx::query_as("SELECT created_at, updated_at FROM commands WHERE name = 'a'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(created, 1_000);
        assert_eq!(updated, 1_500);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (registry, _, _) = registry().await;
        assert!(registry.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_schema_is_database_error() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let registry = SqliteCommandRegistry::new(pool, Arc::new(FixedTimeProvider::new(0)));

        let result = registry.lookup("ping").await;
        assert!(matches!(
            result,
            Err(cmdrelay_core::error::AppError::Database(_))
        ));
    }
}
