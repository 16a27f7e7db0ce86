// CmdRelay Infrastructure - SQLite Adapter
// Implements: CommandRegistry, ExecutionLog, TokenStore

mod command_registry;
mod connection;
mod error;
mod execution_log;
mod migration;
mod token_store;

pub use command_registry::SqliteCommandRegistry;
pub use connection::create_pool;
pub use execution_log::SqliteExecutionLog;
pub use migration::run_migrations;
pub use token_store::SqliteTokenStore;
