//! ChatTransport over Telegram long polling

use crate::client::{TelegramClient, TelegramConfig};
use crate::types::Update;
use async_trait::async_trait;
use cmdrelay_core::error::Result;
use cmdrelay_core::port::{ChatTransport, ConversationId, InboundMessage};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

pub struct TelegramTransport {
    client: TelegramClient,
    /// Next update_id to request; acknowledges everything below it
    next_offset: AtomicI64,
}

impl TelegramTransport {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        Ok(Self::with_client(TelegramClient::new(config)?))
    }

    pub fn with_client(client: TelegramClient) -> Self {
        Self {
            client,
            next_offset: AtomicI64::new(0),
        }
    }
}

/// Keep plain text messages; drop `/commands`, edits, media and the like
fn to_inbound(update: Update) -> Option<InboundMessage> {
    let message = update.message?;
    let text = message.plain_text()?;
    Some(InboundMessage::new(message.chat.id, text))
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn receive(&self) -> Result<Vec<InboundMessage>> {
        let offset = self.next_offset.load(Ordering::SeqCst);
        let updates = self.client.get_updates(offset).await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.next_offset.store(last + 1, Ordering::SeqCst);
        }

        let total = updates.len();
        let messages: Vec<InboundMessage> = updates.into_iter().filter_map(to_inbound).collect();

        if total > 0 {
            debug!(
                updates = total,
                messages = messages.len(),
                "Received updates"
            );
        }

        Ok(messages)
    }

    async fn send_reply(&self, conversation_id: ConversationId, text: &str) -> Result<()> {
        self.client.send_message(conversation_id, text).await
    }

    async fn acknowledge(&self) -> Result<()> {
        let offset = self.next_offset.load(Ordering::SeqCst);
        if offset == 0 {
            return Ok(());
        }

        self.client.confirm_offset(offset).await?;
        debug!(offset, "Acknowledged received updates");
        Ok(())
    }
}
