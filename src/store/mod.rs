//! The data-store seam.
//!
//! The production system talks to a hosted database; this crate only depends
//! on the three traits below. Row types mirror what the hosted service
//! returns — in particular prices arrive as decimal strings and menu ids may
//! be absent on malformed rows — and the
//! [`SnapshotBuilder`](crate::catalog::SnapshotBuilder) normalizes them.

pub mod memory;

pub use memory::InMemoryStore;

use crate::model::{NewOrder, OrderDetailRow, OrderRecord, StoredMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by any store operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing service could not be reached or returned garbage.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a non-success status for a write.
    #[error("store rejected write (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Establishment profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub order_ratio: f64,
}

/// One day of opening hours with its nested sessions, in week order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursRow {
    pub day: String,
    pub open: bool,
    #[serde(default)]
    pub sessions: Vec<SessionRow>,
}

/// A from/to pair nested under an [`HoursRow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRow {
    pub from: String,
    pub to: String,
}

/// Product row; `price` is the service's decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
}

/// Menu row with nested allowed-product links. `id` is optional because the
/// service has been observed to return name-only menu rows; the snapshot
/// builder refuses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuRow {
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub description: String,
    /// Category name → exact required count.
    pub composition: std::collections::HashMap<String, u32>,
    /// Ids of products selectable for this menu.
    pub allowed_product_ids: Vec<String>,
}

/// Read side of the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetches the establishment profile; `Ok(None)` when no such record.
    async fn establishment(&self, id: &str) -> Result<Option<EstablishmentRow>, StoreError>;

    /// Weekly hours with nested sessions, ordered by day of week.
    async fn opening_hours(&self, establishment_id: &str) -> Result<Vec<HoursRow>, StoreError>;

    async fn products(&self, establishment_id: &str) -> Result<Vec<ProductRow>, StoreError>;

    async fn menus(&self, establishment_id: &str) -> Result<Vec<MenuRow>, StoreError>;
}

/// Write side for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order and returns the created row.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRecord, StoreError>;

    /// Inserts a batch of detail rows for an existing order.
    async fn insert_details(&self, details: Vec<OrderDetailRow>) -> Result<(), StoreError>;
}

/// Conversation log persistence.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append_message(
        &self,
        chat_id: &str,
        message: StoredMessage,
    ) -> Result<(), StoreError>;

    /// All messages for a chat, ordered by occurrence.
    async fn messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>, StoreError>;
}
