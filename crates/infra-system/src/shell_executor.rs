// Shell executor implementation
// reason: tokio for async process management
use async_trait::async_trait;
use std::process::{Output, Stdio};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

use cmdrelay_core::domain::reply::NO_OUTPUT_SENTINEL;
use cmdrelay_core::port::command_executor::{CommandExecutor, CommandOutput, ExecutionError};
use cmdrelay_core::port::TimeProvider;

#[cfg(unix)]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Shell executor
///
/// Hands the whole command string to the platform shell, which does all
/// quoting, piping and redirection. Environment and working directory are
/// inherited as-is and there is no timeout: the call returns only when the
/// child exits and both pipes are drained.
pub struct ShellExecutor {
    time_provider: Arc<dyn TimeProvider>,
}

impl ShellExecutor {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Spawn the shell and wait for output
    async fn spawn_and_wait(&self, shell_command: &str) -> Result<Output, ExecutionError> {
        let (shell, flag) = SHELL;

        let child = Command::new(shell)
            .arg(flag)
            .arg(shell_command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(e.to_string()))?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))
    }
}

/// Prefer stdout; fall back to stderr only when stdout produced no bytes.
/// The selected stream is decoded strictly and trimmed.
pub fn select_output(output: &Output) -> Result<String, ExecutionError> {
    let stream = if output.stdout.is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };

    let text = std::str::from_utf8(stream).map_err(|e| ExecutionError::Decode(e.to_string()))?;
    let text = text.trim();

    if text.is_empty() {
        Ok(NO_OUTPUT_SENTINEL.to_string())
    } else {
        Ok(text.to_string())
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    async fn execute(&self, shell_command: &str) -> Result<CommandOutput, ExecutionError> {
        if shell_command.trim().is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let start_time = self.time_provider.now_millis();
        debug!(command = %shell_command, "Starting shell command");

        let output = self.spawn_and_wait(shell_command).await?;
        let duration_ms = self.time_provider.now_millis() - start_time;
        let text = select_output(&output)?;

        info!(
            command = %shell_command,
            duration_ms = %duration_ms,
            exit_code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Shell command completed"
        );

        Ok(CommandOutput {
            text,
            exit_code: output.status.code(),
            duration_ms,
        })
    }
}
