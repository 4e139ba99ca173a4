//! Per-conversation session state.

use crate::model::Snapshot;
use std::sync::Arc;

/// Where the conversation is in the ordering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No snapshot fetched yet; the catalog is unknown.
    AwaitingSnapshot,
    /// Snapshot cached; orders can be opened and filled.
    Ordering,
    /// The user exited. Terminal.
    Closed,
}

/// State owned by one conversation's actor. There is no ambient/global
/// session state anywhere else; tool dispatch receives this by `&mut`.
pub struct Session {
    pub chat_id: String,
    pub establishment_id: String,
    pub state: ConversationState,
    /// Catalog view, cached after the first successful fetch for the rest
    /// of the conversation.
    pub snapshot: Option<Arc<Snapshot>>,
    /// The open order, set only after a confirmed insert. At most one per
    /// conversation.
    pub current_order_id: Option<String>,
}

impl Session {
    pub fn new(chat_id: impl Into<String>, establishment_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            establishment_id: establishment_id.into(),
            state: ConversationState::AwaitingSnapshot,
            snapshot: None,
            current_order_id: None,
        }
    }
}
