//! System wiring and lifecycle.

use crate::catalog::SnapshotBuilder;
use crate::chat::ChatModel;
use crate::conversation::{
    ConversationActor, ConversationClient, ConversationRequest, Session, ToolDeps,
};
use crate::store::{CatalogStore, MessageStore, OrderStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

const REQUEST_BUFFER: usize = 32;
const REPLY_BUFFER: usize = 32;

/// One running conversation plus its plumbing.
///
/// Wires the store, the chat model, and the conversation actor together,
/// hands out the client and the assistant-reply stream, and joins the actor
/// task on shutdown.
pub struct AssistantSystem {
    pub client: ConversationClient,
    handle: tokio::task::JoinHandle<()>,
}

impl AssistantSystem {
    /// Spawns the conversation actor for one chat id. Returns the system and
    /// the stream of assistant replies, one per completed turn.
    pub fn start<M>(
        chat_id: impl Into<String>,
        establishment_id: impl Into<String>,
        debounce: Duration,
        model: M,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        messages: Arc<dyn MessageStore>,
    ) -> (Self, mpsc::Receiver<String>)
    where
        M: ChatModel + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<ConversationRequest>(REQUEST_BUFFER);
        let (outbox, replies) = mpsc::channel(REPLY_BUFFER);

        let session = Session::new(chat_id, establishment_id);
        let deps = ToolDeps {
            builder: SnapshotBuilder::new(catalog),
            orders,
        };
        let actor = ConversationActor::new(
            receiver, outbox, model, session, deps, messages, debounce,
        );
        let handle = tokio::spawn(actor.run());

        let system = Self {
            client: ConversationClient::new(sender),
            handle,
        };
        (system, replies)
    }

    /// Closes the conversation (flushing pending input) and waits for the
    /// actor task to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down");
        // Closing via the client lets the actor run its final turn; if the
        // actor is already gone that is fine too.
        let _ = self.client.close().await;
        drop(self.client);
        if let Err(e) = self.handle.await {
            error!("Conversation task failed: {e:?}");
            return Err(format!("conversation task failed: {e:?}"));
        }
        info!("Shutdown complete");
        Ok(())
    }
}
