//! Error types for snapshot building.

use thiserror::Error;

/// Errors that can occur while building a catalog snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No establishment record exists for the requested id. The session
    /// cannot proceed past this.
    #[error("establishment not found: {0}")]
    NotFound(String),

    /// Hours, products, or menus could not be retrieved or normalized.
    /// Retryable from the model's point of view.
    #[error("catalog data unavailable: {0}")]
    DataUnavailable(String),

    /// A menu row arrived without a real identifier. A name-only menu cannot
    /// be referenced safely later, so the whole build aborts.
    #[error("menu '{0}' has no identifier")]
    InvalidMenu(String),
}
