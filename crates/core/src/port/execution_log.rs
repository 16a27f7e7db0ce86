// Execution Log Port (Interface)

use crate::domain::{LogRecord, NewLogRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Append-only record of execution attempts
#[async_trait]
pub trait ExecutionLog: Send + Sync {
    /// Persist one attempt; the store assigns identity and write time
    async fn append(&self, record: &NewLogRecord) -> Result<LogRecord>;

    /// Most recent attempts, newest first
    async fn recent(&self, limit: u32) -> Result<Vec<LogRecord>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory log with sequential ids and a fixed clock
    #[derive(Default)]
    pub struct InMemoryExecutionLog {
        records: Mutex<Vec<LogRecord>>,
        unavailable: AtomicBool,
    }

    impl InMemoryExecutionLog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every call fail with a database error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Records in append order
        pub fn records(&self) -> Vec<LogRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExecutionLog for InMemoryExecutionLog {
        async fn append(&self, record: &NewLogRecord) -> Result<LogRecord> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AppError::Database("execution log unavailable".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            let stored = LogRecord {
                id: records.len() as i64 + 1,
                command_name: record.command_name.clone(),
                shell_command: record.shell_command.clone(),
                output: record.output.clone(),
                executed_at: 1_700_000_000_000 + records.len() as i64,
            };
            records.push(stored.clone());
            Ok(stored)
        }

        async fn recent(&self, limit: u32) -> Result<Vec<LogRecord>> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AppError::Database("execution log unavailable".to_string()));
            }
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .rev()
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }
}
