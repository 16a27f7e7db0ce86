// SQLite ExecutionLog Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use cmdrelay_core::domain::{LogRecord, NewLogRecord};
use cmdrelay_core::error::Result;
use cmdrelay_core::port::{ExecutionLog, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteExecutionLog {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteExecutionLog {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl ExecutionLog for SqliteExecutionLog {
    async fn append(&self, record: &NewLogRecord) -> Result<LogRecord> {
        let executed_at = self.time_provider.now_millis();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO execution_logs (command_name, command, output, executed_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&record.command_name)
        .bind(&record.shell_command)
        .bind(&record.output)
        .bind(executed_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(LogRecord {
            id,
            command_name: record.command_name.clone(),
            shell_command: record.shell_command.clone(),
            output: record.output.clone(),
            executed_at,
        })
    }

    async fn recent(&self, limit: u32) -> Result<Vec<LogRecord>> {
        let rows: Vec<LogRow> = sqlx::query_as(
            r#"
            SELECT id, command_name, command, output, executed_at
            FROM execution_logs
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LogRow::into_record).collect())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: i64,
    command_name: Option<String>,
    command: String,
    output: String,
    executed_at: i64,
}

impl LogRow {
    fn into_record(self) -> LogRecord {
        LogRecord {
            id: self.id,
            command_name: self.command_name,
            shell_command: self.command,
            output: self.output,
            executed_at: self.executed_at,
        }
    }
}
