//! Error types for the conversation layer.

use crate::chat::ChatError;
use thiserror::Error;

/// Errors that can end a model turn or a client call. Tool-level failures
/// never appear here; those become structured payloads fed back to the
/// model inside the turn.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// The conversation actor is gone.
    #[error("conversation closed")]
    ActorClosed,

    /// The actor dropped the response channel.
    #[error("conversation dropped response channel")]
    ActorDropped,
}
