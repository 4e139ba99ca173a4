//! Validation of proposed order line-items against a catalog snapshot.

pub mod coerce;
pub mod error;
pub mod validate;

pub use coerce::*;
pub use error::*;
pub use validate::*;
