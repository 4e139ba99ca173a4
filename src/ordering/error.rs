//! Error types for order validation.

use thiserror::Error;

/// Validation rejections. Each carries enough context for the model to
/// re-prompt the customer; none of them close the open order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A line-item referenced a product id the catalog does not know.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// A line-item referenced a menu id the catalog does not know.
    #[error("unknown menu: {0}")]
    UnknownMenu(String),

    /// A selected product is not offered by the referenced menu (or does not
    /// exist at all).
    #[error("product {product} is not allowed in menu {menu}")]
    DisallowedProduct { menu: String, product: String },

    /// The selection does not match the menu's composition rule exactly.
    #[error("menu {menu} requires exactly {expected} from '{category}', got {actual}")]
    IncompleteSelection {
        menu: String,
        category: String,
        expected: u32,
        actual: u32,
    },

    /// Quantities start at one.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),
}
