// SQLite TokenStore Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use cmdrelay_core::error::Result;
use cmdrelay_core::port::TokenStore;
use sqlx::SqlitePool;

/// The token lives in a single fixed row
const TOKEN_ROW_ID: i64 = 1;

pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn load_token(&self) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT token FROM bot_tokens WHERE id = ?")
            .bind(TOKEN_ROW_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn save_token(&self, token: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "INSERT INTO bot_tokens (id, token) VALUES (?, ?) \
             ON CONFLICT(id) DO UPDATE SET token = excluded.token",
        )
        .bind(TOKEN_ROW_ID)
        .bind(token)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}
