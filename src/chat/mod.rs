//! The language-model seam: session trait, tool schemas, and implementations.

pub mod mock;
pub mod remote;
pub mod session;
pub mod tools;

pub use mock::*;
pub use remote::*;
pub use session::*;
pub use tools::*;
