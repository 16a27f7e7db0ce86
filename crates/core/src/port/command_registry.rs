// Command Registry Port (Interface)

use crate::domain::CommandEntry;
use crate::error::Result;
use async_trait::async_trait;

/// Durable name -> shell command mapping
#[async_trait]
pub trait CommandRegistry: Send + Sync {
    /// Insert or overwrite the command stored under `entry.name`.
    /// Overwriting keeps the entry's original listing position.
    async fn upsert(&self, entry: &CommandEntry) -> Result<()>;

    /// Find the shell command stored under an exact (case-sensitive) name
    async fn lookup(&self, name: &str) -> Result<Option<String>>;

    /// All entries in storage order (first insertion first)
    async fn list_all(&self) -> Result<Vec<CommandEntry>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory registry preserving insertion order
    #[derive(Default)]
    pub struct InMemoryCommandRegistry {
        entries: Mutex<Vec<CommandEntry>>,
        unavailable: AtomicBool,
    }

    impl InMemoryCommandRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entries(entries: Vec<CommandEntry>) -> Self {
            Self {
                entries: Mutex::new(entries),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Make every call fail with a database error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub fn entries(&self) -> Vec<CommandEntry> {
            self.entries.lock().unwrap().clone()
        }

        fn check_available(&self) -> Result<()> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(AppError::Database("registry unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CommandRegistry for InMemoryCommandRegistry {
        async fn upsert(&self, entry: &CommandEntry) -> Result<()> {
            self.check_available()?;
            let mut entries = self.entries.lock().unwrap();
            match entries.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => existing.shell_command = entry.shell_command.clone(),
                None => entries.push(entry.clone()),
            }
            Ok(())
        }

        async fn lookup(&self, name: &str) -> Result<Option<String>> {
            self.check_available()?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.shell_command.clone()))
        }

        async fn list_all(&self) -> Result<Vec<CommandEntry>> {
            self.check_available()?;
            Ok(self.entries())
        }
    }
}
