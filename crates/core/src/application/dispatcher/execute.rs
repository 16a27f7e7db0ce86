// Execute intent: resolve a target against the registry, run it, log it

use super::Dispatcher;
use crate::domain::reply::error_reply;
use crate::domain::{NewLogRecord, ResolvedCommand};
use crate::error::Result;
use tracing::{info, warn};

impl Dispatcher {
    /// Registered names shadow shell text; anything else runs verbatim.
    pub async fn resolve(&self, target: &str) -> Result<ResolvedCommand> {
        Ok(match self.registry.lookup(target).await? {
            Some(shell_command) => ResolvedCommand::named(target, shell_command),
            None => ResolvedCommand::custom(target),
        })
    }

    /// Returns the full (untruncated) output, which is also what gets logged
    pub(super) async fn run_command(&self, target: &str) -> Result<String> {
        let resolved = self.resolve(target).await?;

        info!(
            command = %resolved.shell_command,
            is_named = resolved.is_named(),
            "Running command"
        );

        let output = match self.executor.execute(&resolved.shell_command).await {
            Ok(output) => {
                info!(
                    exit_code = ?output.exit_code,
                    duration_ms = output.duration_ms,
                    "Command finished"
                );
                output.text
            }
            Err(e) => {
                warn!(error = %e, "Command failed");
                error_reply(e)
            }
        };

        // Failures are logged exactly like successes
        let record = NewLogRecord::new(resolved.name, resolved.shell_command, output.clone());
        self.execution_log.append(&record).await?;

        Ok(output)
    }
}
