// Reply texts and the outbound size bound

use serde::{Deserialize, Serialize};

/// Outbound replies are cut to this many characters
pub const MAX_REPLY_CHARS: usize = 4000;

pub const NO_COMMANDS_REPLY: &str = "No commands saved yet.";
pub const LISTING_HEADER: &str = "Saved Commands:";
pub const REGISTRATION_FORMAT_REPLY: &str = "❌ Format: addcmd command_name | shell_command";
pub const REGISTRATION_EMPTY_REPLY: &str = "❌ Command name and shell command must not be empty.";
pub const NO_OUTPUT_SENTINEL: &str = "✅ Command executed (no output)";

pub fn echo_reply(text: &str) -> String {
    format!("You said: {}", text)
}

pub fn registered_reply(name: &str) -> String {
    format!("✅ Command '{}' added successfully!", name)
}

pub fn registration_failed_reply(reason: impl std::fmt::Display) -> String {
    format!("❌ Failed to add command: {}", reason)
}

pub fn error_reply(reason: impl std::fmt::Display) -> String {
    format!("❌ Error: {}", reason)
}

/// Keep at most [`MAX_REPLY_CHARS`] characters (Unicode scalar values)
pub fn truncate_reply(text: &str) -> &str {
    match text.char_indices().nth(MAX_REPLY_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Inbound message text handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub raw_text: String,
}

impl DispatchRequest {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

/// Reply handed back to the transport; always within the size bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub reply_text: String,
}

impl DispatchResult {
    pub fn new(reply_text: &str) -> Self {
        Self {
            reply_text: truncate_reply(reply_text).to_string(),
        }
    }
}
