// Port Layer - Interfaces for external dependencies

pub mod chat_transport;
pub mod command_executor;
pub mod command_registry;
pub mod execution_log;
pub mod id_provider; // For deterministic testing
pub mod time_provider;
pub mod token_store;

// Re-exports
pub use chat_transport::{ChatTransport, ConversationId, InboundMessage};
pub use command_executor::{CommandExecutor, CommandOutput, ExecutionError};
pub use command_registry::CommandRegistry;
pub use execution_log::ExecutionLog;
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
pub use token_store::TokenStore;
