// Command Executor Port
// Abstraction over running a shell command string. The default adapter runs
// it unrestricted; a stricter one (allow-list, timeout, resource limits) can
// be swapped in without touching the Dispatcher.

use async_trait::async_trait;
use thiserror::Error;

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Selected stream (stdout, else stderr), trimmed; never empty
    pub text: String,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
}

/// Execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Output is not valid UTF-8: {0}")]
    Decode(String),
}

/// Command Executor trait
///
/// Implementations:
/// - ShellExecutor: hands the string to the platform shell
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `shell_command` to completion and capture its output.
    ///
    /// A non-zero exit status is not an error.
    ///
    /// # Errors
    /// - ExecutionError::EmptyCommand for blank input
    /// - ExecutionError::SpawnFailed if the shell cannot be started
    /// - ExecutionError::IoError / Decode when output cannot be collected
    async fn execute(&self, shell_command: &str) -> Result<CommandOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Reply with the command text itself
        EchoCommand,
        /// Always reply with this output
        Output(String),
        /// Always fail
        Fail(ExecutionError),
    }
    /// Mock Command Executor for testing
    pub struct MockCommandExecutor {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<String>>>,
    }
    impl MockCommandExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_echo() -> Self {
            Self::new(MockBehavior::EchoCommand)
        }
        pub fn new_output(output: impl Into<String>) -> Self {
            Self::new(MockBehavior::Output(output.into()))
        }
        pub fn new_fail(error: ExecutionError) -> Self {
            Self::new(MockBehavior::Fail(error))
        }
        /// Commands received, in call order
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }
    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(&self, shell_command: &str) -> Result<CommandOutput, ExecutionError> {
            self.calls.lock().unwrap().push(shell_command.to_string());

            if shell_command.trim().is_empty() {
                return Err(ExecutionError::EmptyCommand);
            }

            let behavior = self.behavior.lock().unwrap().clone();
            let text = match behavior {
                MockBehavior::EchoCommand => shell_command.to_string(),
                MockBehavior::Output(output) => output,
                MockBehavior::Fail(error) => return Err(error),
            };

            Ok(CommandOutput {
                text,
                exit_code: Some(0),
                duration_ms: 1,
            })
        }
    }
}
