//! Catalog snapshot assembly.

pub mod builder;
pub mod error;

pub use builder::*;
pub use error::*;
