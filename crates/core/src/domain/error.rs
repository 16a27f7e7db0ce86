// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Command name must not be empty")]
    EmptyCommandName,

    #[error("Shell command must not be empty")]
    EmptyShellCommand,
}

pub type Result<T> = std::result::Result<T, DomainError>;
