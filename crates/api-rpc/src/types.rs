//! RPC Request/Response Types

use cmdrelay_core::domain::{CommandEntry, LogRecord};
use serde::{Deserialize, Serialize};

/// relay.dispatch.v1 - Handle one message exactly like the chat transport
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub reply: String,
}

/// registry.list.v1 - Stored commands in listing order
#[derive(Debug, Default, Deserialize)]
pub struct ListCommandsRequest {}

#[derive(Debug, Clone, Serialize)]
pub struct CommandView {
    pub name: String,
    pub command: String,
}

impl From<CommandEntry> for CommandView {
    fn from(entry: CommandEntry) -> Self {
        Self {
            name: entry.name,
            command: entry.shell_command,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCommandsResponse {
    pub commands: Vec<CommandView>,
}

/// logs.recent.v1 - Newest execution records first
#[derive(Debug, Deserialize)]
pub struct RecentLogsRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRecordView {
    pub id: i64,
    pub command_name: Option<String>,
    pub command: String,
    pub output: String,
    /// RFC 3339, UTC
    pub executed_at: String,
}

impl From<LogRecord> for LogRecordView {
    fn from(record: LogRecord) -> Self {
        let executed_at = record
            .executed_at_utc()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| record.executed_at.to_string());
        Self {
            id: record.id,
            command_name: record.command_name,
            command: record.shell_command,
            output: record.output,
            executed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentLogsResponse {
    pub records: Vec<LogRecordView>,
}
