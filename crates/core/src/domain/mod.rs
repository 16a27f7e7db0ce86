// Domain Layer - Pure business logic and entities

pub mod command;
pub mod error;
pub mod intent;
pub mod log_record;
pub mod reply;

// Re-exports
pub use command::{CommandEntry, ResolvedCommand};
pub use error::DomainError;
pub use intent::{classify, parse_registration, Intent, RegistrationError};
pub use log_record::{LogRecord, LogRecordId, NewLogRecord};
pub use reply::{truncate_reply, DispatchRequest, DispatchResult, MAX_REPLY_CHARS};
