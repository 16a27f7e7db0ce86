// Command Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// A named shell command stored in the registry.
///
/// Names are unique and case-sensitive, exactly as typed. Both fields are
/// trimmed and non-empty once constructed through [`CommandEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub name: String,
    pub shell_command: String,
}

impl CommandEntry {
    /// Build a validated entry from raw name and command text
    pub fn new(name: impl AsRef<str>, shell_command: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        let shell_command = shell_command.as_ref().trim();

        if name.is_empty() {
            return Err(DomainError::EmptyCommandName);
        }
        if shell_command.is_empty() {
            return Err(DomainError::EmptyShellCommand);
        }

        Ok(Self {
            name: name.to_string(),
            shell_command: shell_command.to_string(),
        })
    }

    /// Render as a listing line: `name → command`
    pub fn listing_line(&self) -> String {
        format!("{} → {}", self.name, self.shell_command)
    }
}

/// Outcome of looking up an execution target in the registry.
///
/// `name` is set only when the target matched a registered name; otherwise the
/// target text itself is the shell command (a custom command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub name: Option<String>,
    pub shell_command: String,
}

impl ResolvedCommand {
    pub fn named(name: impl Into<String>, shell_command: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            shell_command: shell_command.into(),
        }
    }

    pub fn custom(shell_command: impl Into<String>) -> Self {
        Self {
            name: None,
            shell_command: shell_command.into(),
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_trims_fields() {
        let entry = CommandEntry::new("  backup ", " tar -czf /tmp/b.tgz /data  ").unwrap();
        assert_eq!(entry.name, "backup");
        assert_eq!(entry.shell_command, "tar -czf /tmp/b.tgz /data");
    }

    #[test]
    fn test_entry_rejects_blank_parts() {
        assert_eq!(
            CommandEntry::new("   ", "ls").unwrap_err(),
            DomainError::EmptyCommandName
        );
        assert_eq!(
            CommandEntry::new("ls", "").unwrap_err(),
            DomainError::EmptyShellCommand
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let lower = CommandEntry::new("ping", "echo pong").unwrap();
        let upper = CommandEntry::new("Ping", "echo pong").unwrap();
        assert_ne!(lower.name, upper.name);
    }

    #[test]
    fn test_listing_line() {
        let entry = CommandEntry::new("ping", "echo pong").unwrap();
        assert_eq!(entry.listing_line(), "ping → echo pong");
    }

    #[test]
    fn test_resolved_command_kind() {
        assert!(ResolvedCommand::named("ping", "echo pong").is_named());
        assert!(!ResolvedCommand::custom("uptime").is_named());
    }
}
