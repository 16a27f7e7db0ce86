// Execution Log Domain Model

use serde::{Deserialize, Serialize};

/// Auto-incremented log identity
pub type LogRecordId = i64;

/// One execution attempt, as it is about to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogRecord {
    pub command_name: Option<String>,
    pub shell_command: String,
    pub output: String,
}

impl NewLogRecord {
    pub fn new(
        command_name: Option<String>,
        shell_command: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            command_name,
            shell_command: shell_command.into(),
            output: output.into(),
        }
    }
}

/// Persisted execution attempt (immutable once written)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: LogRecordId,
    pub command_name: Option<String>,
    pub shell_command: String,
    pub output: String,
    pub executed_at: i64, // epoch ms, write time
}

impl LogRecord {
    /// Write time as a UTC timestamp, if representable
    pub fn executed_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.executed_at)
    }
}
