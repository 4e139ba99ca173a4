//! Builds the immutable [`Snapshot`] from store rows.
//!
//! The builder is the only place that reads the catalog side of the store.
//! It normalizes decimal-string prices, refuses menus without identifiers,
//! and derives each menu's `options_by_category` by grouping its allowed
//! products by category. Allowed ids that no longer resolve to a product are
//! skipped with a warning rather than failing the build; the validator will
//! still reject them if a customer selects one.

use crate::catalog::CatalogError;
use crate::model::{DaySchedule, MenuInfo, MenuOption, ProductInfo, Snapshot, TimeSession};
use crate::store::{CatalogStore, MenuRow, ProductRow, StoreError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Assembles consistent snapshots of one establishment's catalog.
pub struct SnapshotBuilder {
    store: Arc<dyn CatalogStore>,
}

impl SnapshotBuilder {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Fetches and assembles the snapshot for `establishment_id`.
    ///
    /// # Errors
    /// - [`CatalogError::NotFound`] when the establishment record is absent.
    /// - [`CatalogError::DataUnavailable`] when any read fails or a price
    ///   cannot be parsed.
    /// - [`CatalogError::InvalidMenu`] when a menu row has no id.
    pub async fn build(&self, establishment_id: &str) -> Result<Snapshot, CatalogError> {
        let establishment = self
            .store
            .establishment(establishment_id)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| CatalogError::NotFound(establishment_id.to_string()))?;

        let hours = self
            .store
            .opening_hours(establishment_id)
            .await
            .map_err(unavailable)?;
        let product_rows = self
            .store
            .products(establishment_id)
            .await
            .map_err(unavailable)?;
        let menu_rows = self.store.menus(establishment_id).await.map_err(unavailable)?;

        let products: Vec<ProductInfo> = product_rows
            .into_iter()
            .map(normalize_product)
            .collect::<Result<_, _>>()?;

        let menus: Vec<MenuInfo> = {
            let by_id: HashMap<&str, &ProductInfo> =
                products.iter().map(|p| (p.id.as_str(), p)).collect();
            menu_rows
                .into_iter()
                .map(|row| normalize_menu(row, &by_id))
                .collect::<Result<_, _>>()?
        };

        let hours: Vec<DaySchedule> = hours
            .into_iter()
            .map(|row| DaySchedule {
                day: row.day,
                open: row.open,
                sessions: row
                    .sessions
                    .into_iter()
                    .map(|s| TimeSession { from: s.from, to: s.to })
                    .collect(),
            })
            .collect();

        let snapshot = Snapshot::new(
            establishment.id,
            establishment.name,
            establishment.address,
            establishment.phone,
            establishment.order_ratio,
            hours,
            products,
            menus,
        );
        info!(
            establishment_id,
            products = snapshot.products.len(),
            menus = snapshot.menus.len(),
            "Snapshot built"
        );
        Ok(snapshot)
    }
}

fn unavailable(e: StoreError) -> CatalogError {
    CatalogError::DataUnavailable(e.to_string())
}

fn parse_price(raw: &str, what: &str) -> Result<f64, CatalogError> {
    raw.trim().parse::<f64>().map_err(|_| {
        CatalogError::DataUnavailable(format!("unparseable price '{raw}' for {what}"))
    })
}

fn normalize_product(row: ProductRow) -> Result<ProductInfo, CatalogError> {
    let price = parse_price(&row.price, &format!("product {}", row.id))?;
    Ok(ProductInfo {
        id: row.id,
        name: row.name,
        category: row.category,
        price,
    })
}

fn normalize_menu(
    row: MenuRow,
    products: &HashMap<&str, &ProductInfo>,
) -> Result<MenuInfo, CatalogError> {
    let id = row
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CatalogError::InvalidMenu(row.name.clone()))?;
    let price = parse_price(&row.price, &format!("menu {id}"))?;

    let mut options_by_category: HashMap<String, Vec<MenuOption>> = HashMap::new();
    let mut allowed_product_ids = HashSet::with_capacity(row.allowed_product_ids.len());
    for product_id in row.allowed_product_ids {
        match products.get(product_id.as_str()) {
            Some(product) => {
                options_by_category
                    .entry(product.category.clone())
                    .or_default()
                    .push(MenuOption {
                        id: product.id.clone(),
                        name: product.name.clone(),
                    });
            }
            None => {
                // Stale link in the catalog. Tolerated, but loud enough to spot.
                warn!(menu = %id, product_id, "Allowed product missing from catalog, skipping");
            }
        }
        allowed_product_ids.insert(product_id);
    }
    debug!(menu = %id, categories = options_by_category.len(), "Menu normalized");

    Ok(MenuInfo {
        id,
        name: row.name,
        price,
        description: row.description,
        composition: row.composition,
        allowed_product_ids,
        options_by_category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EstablishmentRow, HoursRow, InMemoryStore, SessionRow};

    fn seeded_store() -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        store.seed_establishment(EstablishmentRow {
            id: "est-1".into(),
            name: "La Esquina".into(),
            address: "Calle Mayor 1".into(),
            phone: "600000000".into(),
            order_ratio: 0.8,
        });
        store.seed_hours(
            "est-1",
            vec![
                HoursRow {
                    day: "lunes".into(),
                    open: true,
                    sessions: vec![SessionRow { from: "12:00".into(), to: "16:00".into() }],
                },
                HoursRow { day: "martes".into(), open: false, sessions: vec![] },
            ],
        );
        store.seed_products(
            "est-1",
            vec![
                ProductRow {
                    id: "p-1".into(),
                    name: "Bocadillo".into(),
                    category: "main".into(),
                    price: "6.50".into(),
                },
                ProductRow {
                    id: "p-2".into(),
                    name: "Agua".into(),
                    category: "drink".into(),
                    price: "1.20".into(),
                },
            ],
        );
        store.seed_menus(
            "est-1",
            vec![MenuRow {
                id: Some("menu-1".into()),
                name: "Combo Dulce".into(),
                price: "9.90".into(),
                description: "Main plus drink".into(),
                composition: [("main".to_string(), 1), ("drink".to_string(), 1)].into(),
                allowed_product_ids: vec!["p-1".into(), "p-2".into(), "p-gone".into()],
            }],
        );
        Arc::new(store)
    }

    #[tokio::test]
    async fn builds_snapshot_with_indices_and_grouped_options() {
        let builder = SnapshotBuilder::new(seeded_store());
        let snapshot = builder.build("est-1").await.unwrap();

        assert_eq!(snapshot.name, "La Esquina");
        assert_eq!(snapshot.hours.len(), 2);
        assert_eq!(snapshot.product("p-1").unwrap().price, 6.50);

        let menu = snapshot.menu_by_id("menu-1").unwrap();
        assert_eq!(menu.price, 9.90);
        assert_eq!(menu.options_by_category["main"].len(), 1);
        assert_eq!(menu.options_by_category["drink"].len(), 1);
        assert_eq!(snapshot.menu_by_name("combo dulce").unwrap().id, "menu-1");
    }

    #[tokio::test]
    async fn stale_allowed_id_is_skipped_not_fatal() {
        let builder = SnapshotBuilder::new(seeded_store());
        let snapshot = builder.build("est-1").await.unwrap();
        let menu = snapshot.menu_by_id("menu-1").unwrap();

        // The dangling id stays in allowed_product_ids but appears nowhere
        // in the grouped options.
        assert!(menu.allowed_product_ids.contains("p-gone"));
        let all_option_ids: Vec<&str> = menu
            .options_by_category
            .values()
            .flatten()
            .map(|o| o.id.as_str())
            .collect();
        assert!(!all_option_ids.contains(&"p-gone"));
    }

    #[tokio::test]
    async fn missing_establishment_is_not_found() {
        let builder = SnapshotBuilder::new(seeded_store());
        let err = builder.build("est-404").await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound("est-404".into()));
    }

    #[tokio::test]
    async fn menu_without_id_aborts_the_build() {
        let store = seeded_store();
        store.seed_menus(
            "est-1",
            vec![MenuRow {
                id: None,
                name: "Fantasma".into(),
                price: "5.00".into(),
                description: String::new(),
                composition: HashMap::new(),
                allowed_product_ids: vec![],
            }],
        );
        let builder = SnapshotBuilder::new(store);
        let err = builder.build("est-1").await.unwrap_err();
        assert_eq!(err, CatalogError::InvalidMenu("Fantasma".into()));
    }

    #[tokio::test]
    async fn unparseable_price_is_data_unavailable() {
        let store = seeded_store();
        store.seed_products(
            "est-1",
            vec![ProductRow {
                id: "p-1".into(),
                name: "Bocadillo".into(),
                category: "main".into(),
                price: "six fifty".into(),
            }],
        );
        let builder = SnapshotBuilder::new(store);
        let err = builder.build("est-1").await.unwrap_err();
        assert!(matches!(err, CatalogError::DataUnavailable(_)));
    }
}
