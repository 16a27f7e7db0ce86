//! Shared wiring: SQLite adapters + real shell behind one Dispatcher

#![allow(dead_code)]

use std::sync::Arc;

use cmdrelay_core::application::Dispatcher;
use cmdrelay_core::domain::DispatchRequest;
use cmdrelay_core::port::id_provider::UuidProvider;
use cmdrelay_core::port::time_provider::SystemTimeProvider;
use cmdrelay_infra_sqlite::{
    create_pool, run_migrations, SqliteCommandRegistry, SqliteExecutionLog,
};
use cmdrelay_infra_system::ShellExecutor;
use sqlx::SqlitePool;

pub struct Relay {
    pub pool: SqlitePool,
    pub registry: Arc<SqliteCommandRegistry>,
    pub execution_log: Arc<SqliteExecutionLog>,
    pub dispatcher: Arc<Dispatcher>,
}

impl Relay {
    pub async fn open(database_url: &str) -> Self {
        let pool = create_pool(database_url).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let time_provider = Arc::new(SystemTimeProvider);
        let registry = Arc::new(SqliteCommandRegistry::new(
            pool.clone(),
            time_provider.clone(),
        ));
        let execution_log = Arc::new(SqliteExecutionLog::new(
            pool.clone(),
            time_provider.clone(),
        ));
        let dispatcher = Arc::new(Dispatcher::new(
            registry.clone(),
            execution_log.clone(),
            Arc::new(ShellExecutor::new(time_provider)),
            Arc::new(UuidProvider),
        ));

        Self {
            pool,
            registry,
            execution_log,
            dispatcher,
        }
    }

    pub async fn in_memory() -> Self {
        Self::open("sqlite::memory:").await
    }

    /// Reply text for one inbound message
    pub async fn send(&self, text: &str) -> String {
        self.dispatcher
            .dispatch(DispatchRequest::new(text))
            .await
            .unwrap()
            .reply_text
    }
}
