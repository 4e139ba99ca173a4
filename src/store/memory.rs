//! In-memory store used by tests and the offline demo mode.
//!
//! Built fixture-style: seed it with an establishment, hours, products, and
//! menus, then hand it to the system as all three store traits. Write
//! counters are exposed so tests can assert exactly how many inserts a flow
//! performed.

use crate::model::{NewOrder, OrderDetailRow, OrderRecord, StoredMessage};
use crate::store::{
    CatalogStore, EstablishmentRow, HoursRow, MenuRow, MessageStore, OrderStore, ProductRow,
    StoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    establishments: HashMap<String, EstablishmentRow>,
    hours: HashMap<String, Vec<HoursRow>>,
    products: HashMap<String, Vec<ProductRow>>,
    menus: HashMap<String, Vec<MenuRow>>,
    orders: HashMap<String, OrderRecord>,
    details: Vec<OrderDetailRow>,
    messages: HashMap<String, Vec<StoredMessage>>,
}

/// In-memory implementation of all three store traits.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    next_order_id: AtomicU64,
    order_inserts: AtomicU64,
    detail_inserts: AtomicU64,
    /// When set, every write fails with this status (for failure-path tests).
    write_failure: Mutex<Option<(u16, String)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Fixture seeding ---

    pub fn seed_establishment(&self, row: EstablishmentRow) -> &Self {
        let mut t = self.tables.lock().unwrap();
        t.establishments.insert(row.id.clone(), row);
        self
    }

    pub fn seed_hours(&self, establishment_id: &str, rows: Vec<HoursRow>) -> &Self {
        let mut t = self.tables.lock().unwrap();
        t.hours.insert(establishment_id.to_string(), rows);
        self
    }

    pub fn seed_products(&self, establishment_id: &str, rows: Vec<ProductRow>) -> &Self {
        let mut t = self.tables.lock().unwrap();
        t.products.insert(establishment_id.to_string(), rows);
        self
    }

    pub fn seed_menus(&self, establishment_id: &str, rows: Vec<MenuRow>) -> &Self {
        let mut t = self.tables.lock().unwrap();
        t.menus.insert(establishment_id.to_string(), rows);
        self
    }

    /// Makes every subsequent write fail with the given status and message.
    pub fn reject_writes(&self, status: u16, message: impl Into<String>) {
        *self.write_failure.lock().unwrap() = Some((status, message.into()));
    }

    // --- Test observation ---

    pub fn order_insert_count(&self) -> u64 {
        self.order_inserts.load(Ordering::SeqCst)
    }

    pub fn detail_insert_count(&self) -> u64 {
        self.detail_inserts.load(Ordering::SeqCst)
    }

    pub fn stored_details(&self) -> Vec<OrderDetailRow> {
        self.tables.lock().unwrap().details.clone()
    }

    fn rejection(&self) -> Option<StoreError> {
        self.write_failure
            .lock()
            .unwrap()
            .as_ref()
            .map(|(status, message)| StoreError::Rejected {
                status: *status,
                message: message.clone(),
            })
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn establishment(&self, id: &str) -> Result<Option<EstablishmentRow>, StoreError> {
        Ok(self.tables.lock().unwrap().establishments.get(id).cloned())
    }

    async fn opening_hours(&self, establishment_id: &str) -> Result<Vec<HoursRow>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .hours
            .get(establishment_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn products(&self, establishment_id: &str) -> Result<Vec<ProductRow>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .products
            .get(establishment_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn menus(&self, establishment_id: &str) -> Result<Vec<MenuRow>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .menus
            .get(establishment_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRecord, StoreError> {
        if let Some(err) = self.rejection() {
            return Err(err);
        }
        let n = self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = OrderRecord {
            id: format!("order_{n}"),
            chat_id: order.chat_id,
            establishment_id: order.establishment_id,
            pickup: order.pickup,
            address: order.address,
            created_at: Utc::now(),
        };
        let mut t = self.tables.lock().unwrap();
        t.orders.insert(record.id.clone(), record.clone());
        self.order_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn insert_details(&self, details: Vec<OrderDetailRow>) -> Result<(), StoreError> {
        if let Some(err) = self.rejection() {
            return Err(err);
        }
        let mut t = self.tables.lock().unwrap();
        self.detail_inserts
            .fetch_add(details.len() as u64, Ordering::SeqCst);
        t.details.extend(details);
        Ok(())
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn append_message(
        &self,
        chat_id: &str,
        message: StoredMessage,
    ) -> Result<(), StoreError> {
        let mut t = self.tables.lock().unwrap();
        t.messages
            .entry(chat_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn messages(&self, chat_id: &str) -> Result<Vec<StoredMessage>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .messages
            .get(chat_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChatRole;

    #[tokio::test]
    async fn order_ids_are_sequential_and_counted() {
        let store = InMemoryStore::new();
        let order = NewOrder {
            chat_id: "chat-1".into(),
            establishment_id: "est-1".into(),
            pickup: true,
            address: None,
        };
        let first = store.insert_order(order.clone()).await.unwrap();
        let second = store.insert_order(order).await.unwrap();
        assert_eq!(first.id, "order_1");
        assert_eq!(second.id, "order_2");
        assert_eq!(store.order_insert_count(), 2);
    }

    #[tokio::test]
    async fn rejected_writes_do_not_touch_tables() {
        let store = InMemoryStore::new();
        store.reject_writes(503, "maintenance");
        let result = store
            .insert_order(NewOrder {
                chat_id: "chat-1".into(),
                establishment_id: "est-1".into(),
                pickup: true,
                address: None,
            })
            .await;
        assert_eq!(
            result,
            Err(StoreError::Rejected {
                status: 503,
                message: "maintenance".into()
            })
        );
        assert_eq!(store.order_insert_count(), 0);
    }

    #[tokio::test]
    async fn messages_keep_arrival_order() {
        let store = InMemoryStore::new();
        store
            .append_message("chat-1", StoredMessage::text(ChatRole::User, "hola"))
            .await
            .unwrap();
        store
            .append_message("chat-1", StoredMessage::text(ChatRole::Assistant, "buenas"))
            .await
            .unwrap();
        let log = store.messages("chat-1").await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, ChatRole::User);
        assert_eq!(log[1].role, ChatRole::Assistant);
    }
}
