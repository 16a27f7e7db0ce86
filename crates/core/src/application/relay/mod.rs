// Relay Loop - pulls messages from the chat transport and answers them
//
// Each conversation gets its own lane (task + channel): messages of one
// conversation are dispatched strictly in arrival order, different
// conversations run concurrently.

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::dispatcher::Dispatcher;
use crate::domain::reply::error_reply;
use crate::domain::{DispatchRequest, DispatchResult};
use crate::error::Result;
use crate::port::{ChatTransport, ConversationId, InboundMessage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Sleep duration after a failed poll before polling again (1s)
pub const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Per-conversation worker: its inbox and the task draining it
struct Lane {
    inbox: mpsc::UnboundedSender<InboundMessage>,
    task: JoinHandle<()>,
}

pub struct RelayLoop {
    transport: Arc<dyn ChatTransport>,
    dispatcher: Arc<Dispatcher>,
}

impl RelayLoop {
    pub fn new(transport: Arc<dyn ChatTransport>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            transport,
            dispatcher,
        }
    }

    /// Run until shutdown is signalled.
    ///
    /// On shutdown the transport is told that every received message was
    /// handled, then each lane finishes the messages it already holds before
    /// this returns. Launched commands are never cancelled.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!("Relay loop started");
        let mut lanes: HashMap<ConversationId, Lane> = HashMap::new();

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            tokio::select! {
                polled = self.transport.receive() => match polled {
                    Ok(batch) => {
                        for message in batch {
                            self.route(&mut lanes, message);
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Polling transport failed");
                        tokio::select! {
                            _ = sleep(POLL_ERROR_BACKOFF) => {},
                            _ = shutdown.wait() => break,
                        }
                    }
                },
                _ = shutdown.wait() => break,
            }
        }

        info!(open_lanes = lanes.len(), "Relay loop stopped, draining lanes");

        if let Err(e) = self.transport.acknowledge().await {
            warn!(error = %e, "Failed to acknowledge received messages");
        }

        drain(lanes).await;
        info!("All lanes drained");
        Ok(())
    }

    fn route(&self, lanes: &mut HashMap<ConversationId, Lane>, message: InboundMessage) {
        let conversation_id = message.conversation_id;
        let lane = lanes
            .entry(conversation_id)
            .or_insert_with(|| self.spawn_lane(conversation_id));

        // A closed lane means its task died (panic in a collaborator)
        if let Err(mpsc::error::SendError(message)) = lane.inbox.send(message) {
            warn!(conversation_id, "Lane closed unexpectedly, respawning");
            let fresh = self.spawn_lane(conversation_id);
            let _ = fresh.inbox.send(message);
            lanes.insert(conversation_id, fresh);
        }
    }

    fn spawn_lane(&self, conversation_id: ConversationId) -> Lane {
        let (tx, mut rx) = mpsc::unbounded_channel::<InboundMessage>();
        let transport = Arc::clone(&self.transport);
        let dispatcher = Arc::clone(&self.dispatcher);

        let task = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                answer(&dispatcher, transport.as_ref(), message).await;
            }
            info!(conversation_id, "Lane closed");
        });

        Lane { inbox: tx, task }
    }
}

/// Close every inbox, then wait for each lane to answer what it holds
async fn drain(lanes: HashMap<ConversationId, Lane>) {
    let tasks: Vec<(ConversationId, JoinHandle<()>)> = lanes
        .into_iter()
        .map(|(conversation_id, lane)| (conversation_id, lane.task))
        .collect();

    for (conversation_id, task) in tasks {
        if let Err(e) = task.await {
            error!(conversation_id, error = %e, "Lane task failed");
        }
    }
}

/// Dispatch one message and always attempt a reply
async fn answer(dispatcher: &Dispatcher, transport: &dyn ChatTransport, message: InboundMessage) {
    let conversation_id = message.conversation_id;

    let reply = match dispatcher.dispatch(DispatchRequest::new(message.text)).await {
        Ok(result) => result.reply_text,
        Err(e) => {
            error!(conversation_id, error = %e, "Dispatch failed");
            DispatchResult::new(&error_reply(e)).reply_text
        }
    };

    if let Err(e) = transport.send_reply(conversation_id, &reply).await {
        error!(conversation_id, error = %e, "Failed to deliver reply");
    }
}
