//! The per-conversation actor and its collaborators.
//!
//! One conversation = one Tokio task. The actor owns the chat session, the
//! cached snapshot, and the open-order pointer; everything it does is
//! sequential, so a slow model turn can never interleave with another turn
//! of the same conversation.

pub mod actor;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod turn;

pub use actor::*;
pub use client::*;
pub use dispatch::*;
pub use error::*;
pub use session::*;
pub use turn::*;
