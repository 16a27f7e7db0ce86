//! Bot API Request/Response Types
//!
//! Only the fields the relay reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i32>,
}

/// getUpdates parameters
#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest<'a> {
    pub offset: i64,
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub allowed_updates: &'a [&'a str],
}

/// sendMessage parameters
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

impl Message {
    /// Telegram `/command` messages start with a bot_command entity
    pub fn is_bot_command(&self) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == "bot_command" && e.offset == 0)
    }

    /// Text of a plain (non-command) text message
    pub fn plain_text(&self) -> Option<&str> {
        if self.is_bot_command() {
            return None;
        }
        self.text.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: i64,
    pub length: i64,
}
