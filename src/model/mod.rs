//! Pure data structures shared across the crate.

pub mod message;
pub mod order;
pub mod snapshot;

pub use message::*;
pub use order::*;
pub use snapshot::*;
