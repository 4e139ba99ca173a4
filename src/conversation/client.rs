//! Client handle for a running conversation actor.

use crate::conversation::{ConversationError, ConversationRequest};
use tokio::sync::{mpsc, oneshot};

/// Type-safe sender half of a conversation. Cloneable; all clones feed the
/// same actor.
#[derive(Clone)]
pub struct ConversationClient {
    sender: mpsc::Sender<ConversationRequest>,
}

impl ConversationClient {
    pub fn new(sender: mpsc::Sender<ConversationRequest>) -> Self {
        Self { sender }
    }

    /// Queues one line of user input for debounced processing.
    pub async fn send_input(&self, text: impl Into<String>) -> Result<(), ConversationError> {
        self.sender
            .send(ConversationRequest::Input(text.into()))
            .await
            .map_err(|_| ConversationError::ActorClosed)
    }

    /// Flushes pending input through a final turn and closes the
    /// conversation. Resolves once the actor has acknowledged.
    pub async fn close(&self) -> Result<(), ConversationError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ConversationRequest::Close { respond_to })
            .await
            .map_err(|_| ConversationError::ActorClosed)?;
        response.await.map_err(|_| ConversationError::ActorDropped)
    }
}
