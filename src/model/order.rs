//! Order drafts and persisted order rows.
//!
//! Drafts are what the conversation layer assembles from tool calls and
//! validates; the persisted records are owned by the
//! [`OrderStore`](crate::store::OrderStore) and referenced here only by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for creating a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub chat_id: String,
    pub establishment_id: String,
    pub pickup: bool,
    /// Delivery address. Required when `pickup` is false; enforced at the
    /// tool boundary before the draft reaches the store.
    pub address: Option<String>,
}

/// One proposed line-item, as a tagged variant: a plain product or a
/// composed menu with its selected products. The tagging rules out the
/// "both ids set" and "neither id set" shapes a loose object would allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailDraft {
    Product {
        product_id: String,
        quantity: u32,
    },
    Menu {
        menu_id: String,
        selected_product_ids: Vec<String>,
        quantity: u32,
    },
}

impl DetailDraft {
    pub fn quantity(&self) -> u32 {
        match self {
            DetailDraft::Product { quantity, .. } => *quantity,
            DetailDraft::Menu { quantity, .. } => *quantity,
        }
    }
}

/// A persisted order row, as returned by the store after a confirmed insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub chat_id: String,
    pub establishment_id: String,
    pub pickup: bool,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A persisted order-detail row. The `order_id` is always the open order of
/// the conversation that produced it; callers cannot pick another order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailRow {
    pub order_id: String,
    pub detail: DetailDraft,
}
