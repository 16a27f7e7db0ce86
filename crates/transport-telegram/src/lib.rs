//! Telegram Transport
//!
//! Implements the `ChatTransport` port over the Telegram Bot API using
//! long polling (`getUpdates`) and plain-text `sendMessage` replies.

pub mod client;
pub mod transport;
pub mod types;

pub use client::{TelegramClient, TelegramConfig};
pub use transport::TelegramTransport;
