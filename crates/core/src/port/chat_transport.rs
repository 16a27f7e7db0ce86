// Chat Transport Port
// The bot-side boundary: delivers inbound text, carries replies back.

use crate::error::Result;
use async_trait::async_trait;

/// Conversation (chat) identifier as issued by the transport
pub type ConversationId = i64;

/// One inbound text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub conversation_id: ConversationId,
    pub text: String,
}

impl InboundMessage {
    pub fn new(conversation_id: ConversationId, text: impl Into<String>) -> Self {
        Self {
            conversation_id,
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Wait for the next batch of messages (one poll; may be empty)
    async fn receive(&self) -> Result<Vec<InboundMessage>>;

    /// Deliver a reply to a conversation
    async fn send_reply(&self, conversation_id: ConversationId, text: &str) -> Result<()>;

    /// Tell the backend that everything received so far was handled, so a
    /// restarted relay is not handed the same messages again.
    async fn acknowledge(&self) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    enum Poll {
        Batch(Vec<InboundMessage>),
        Fail(String),
    }

    /// Scripted transport: hands out queued batches, records replies
    #[derive(Default)]
    pub struct MockChatTransport {
        polls: Mutex<VecDeque<Poll>>,
        sent: Mutex<Vec<(ConversationId, String)>>,
        acknowledgements: AtomicUsize,
    }

    impl MockChatTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_batch(&self, batch: Vec<InboundMessage>) {
            self.polls.lock().unwrap().push_back(Poll::Batch(batch));
        }

        /// Queue a poll that fails with a transport error
        pub fn push_failure(&self, reason: impl Into<String>) {
            self.polls.lock().unwrap().push_back(Poll::Fail(reason.into()));
        }

        pub fn acknowledgements(&self) -> usize {
            self.acknowledgements.load(Ordering::SeqCst)
        }

        /// Replies sent so far, in send order
        pub fn sent(&self) -> Vec<(ConversationId, String)> {
            self.sent.lock().unwrap().clone()
        }

        /// Poll until at least `count` replies were sent or `timeout` passes
        pub async fn wait_for_replies(&self, count: usize, timeout: Duration) -> bool {
            let deadline = tokio::time::Instant::now() + timeout;
            while tokio::time::Instant::now() < deadline {
                if self.sent.lock().unwrap().len() >= count {
                    return true;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            self.sent.lock().unwrap().len() >= count
        }
    }

    #[async_trait]
    impl ChatTransport for MockChatTransport {
        async fn receive(&self) -> Result<Vec<InboundMessage>> {
            let next = self.polls.lock().unwrap().pop_front();
            match next {
                Some(Poll::Batch(batch)) => Ok(batch),
                Some(Poll::Fail(reason)) => Err(AppError::Transport(reason)),
                None => {
                    // Emulate an empty long poll
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok(Vec::new())
                }
            }
        }

        async fn send_reply(&self, conversation_id: ConversationId, text: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((conversation_id, text.to_string()));
            Ok(())
        }

        async fn acknowledge(&self) -> Result<()> {
            self.acknowledgements.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
