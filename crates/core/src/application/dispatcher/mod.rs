// Dispatcher - classifies inbound text and routes it to an intent handler

mod execute;
#[cfg(test)]
mod dispatcher_test;

use crate::domain::reply::{
    echo_reply, registered_reply, registration_failed_reply, LISTING_HEADER, NO_COMMANDS_REPLY,
    REGISTRATION_EMPTY_REPLY, REGISTRATION_FORMAT_REPLY,
};
use crate::domain::{
    classify, parse_registration, DispatchRequest, DispatchResult, Intent, RegistrationError,
};
use crate::error::Result;
use crate::port::{CommandExecutor, CommandRegistry, ExecutionLog, IdProvider};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Dispatcher with injected collaborators.
///
/// Holds no mutable state of its own; one instance is shared by every
/// conversation for the lifetime of the process.
pub struct Dispatcher {
    registry: Arc<dyn CommandRegistry>,
    execution_log: Arc<dyn ExecutionLog>,
    executor: Arc<dyn CommandExecutor>,
    id_provider: Arc<dyn IdProvider>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<dyn CommandRegistry>,
        execution_log: Arc<dyn ExecutionLog>,
        executor: Arc<dyn CommandExecutor>,
        id_provider: Arc<dyn IdProvider>,
    ) -> Self {
        Self {
            registry,
            execution_log,
            executor,
            id_provider,
        }
    }

    /// Handle one inbound message and produce the reply.
    ///
    /// # Errors
    /// Registry or execution-log faults (other than a failed registration
    /// write, which is answered in-band) propagate to the caller.
    pub async fn dispatch(&self, request: DispatchRequest) -> Result<DispatchResult> {
        let intent = classify(&request.raw_text);
        let span = info_span!(
            "dispatch",
            dispatch_id = %self.id_provider.generate_id(),
            intent = intent.kind()
        );

        async move {
            info!(text = %request.raw_text.trim(), "Received message");

            let reply = match intent {
                Intent::Execute { target } => self.run_command(&target).await?,
                Intent::Register { payload } => self.register(&payload).await,
                Intent::List => self.list_commands().await?,
                Intent::Echo { text } => echo_reply(&text),
            };

            Ok(DispatchResult::new(&reply))
        }
        .instrument(span)
        .await
    }

    async fn register(&self, payload: &str) -> String {
        let entry = match parse_registration(payload) {
            Ok(entry) => entry,
            Err(RegistrationError::MissingSeparator) => {
                return REGISTRATION_FORMAT_REPLY.to_string();
            }
            Err(RegistrationError::Invalid(reason)) => {
                info!(reason = %reason, "Rejected registration");
                return REGISTRATION_EMPTY_REPLY.to_string();
            }
        };

        match self.registry.upsert(&entry).await {
            Ok(()) => {
                info!(name = %entry.name, command = %entry.shell_command, "Command registered");
                registered_reply(&entry.name)
            }
            Err(e) => {
                warn!(name = %entry.name, error = %e, "Failed to register command");
                registration_failed_reply(e)
            }
        }
    }

    async fn list_commands(&self) -> Result<String> {
        let entries = self.registry.list_all().await?;

        if entries.is_empty() {
            return Ok(NO_COMMANDS_REPLY.to_string());
        }

        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(LISTING_HEADER.to_string());
        lines.extend(entries.iter().map(|e| e.listing_line()));
        Ok(lines.join("\n"))
    }
}
