//! Runtime wiring: configuration, observability, and system lifecycle.

pub mod config;
pub mod system;
pub mod tracing;

pub use config::*;
pub use system::*;
pub use tracing::*;
