//! The immutable catalog snapshot and its building blocks.
//!
//! A [`Snapshot`] is a point-in-time view of one establishment's public
//! ordering data: identity, weekly hours, products, and menus, together with
//! the lookup indices the validator needs. It is built once per conversation
//! by the [`SnapshotBuilder`](crate::catalog::SnapshotBuilder), cached for
//! the rest of the session, and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One opening/closing window within a day, e.g. `12:00`–`16:00`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSession {
    pub from: String,
    pub to: String,
}

/// Opening schedule for a single day of the week, in week order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub open: bool,
    /// Empty when the establishment is closed that day.
    #[serde(default)]
    pub sessions: Vec<TimeSession>,
}

/// A single orderable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
}

/// A product offered as a choice within a menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    pub id: String,
    pub name: String,
}

/// A composed menu: a fixed price for a selection of products, constrained
/// by a per-category composition rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuInfo {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    /// Category name → exact number of products required from it.
    pub composition: HashMap<String, u32>,
    /// Every product id that may be selected for this menu.
    pub allowed_product_ids: HashSet<String>,
    /// Allowed products grouped by category, for presentation to the model.
    /// Ids here are always a subset of `allowed_product_ids`.
    pub options_by_category: HashMap<String, Vec<MenuOption>>,
}

/// Immutable view of one establishment's catalog, with lookup indices.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub establishment_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub order_ratio: f64,
    pub hours: Vec<DaySchedule>,
    pub products: Vec<ProductInfo>,
    pub menus: Vec<MenuInfo>,
    /// Product id → position in `products`.
    #[serde(skip)]
    products_index: HashMap<String, usize>,
    /// Menu id → position in `menus`.
    #[serde(skip)]
    menus_index_by_id: HashMap<String, usize>,
    /// Lowercased menu name → position in `menus`.
    #[serde(skip)]
    menus_index_by_name: HashMap<String, usize>,
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Assembles a snapshot and derives its indices.
    ///
    /// The builder is responsible for the heavier invariants (menu ids
    /// present, `options_by_category` consistent); this constructor only
    /// indexes what it is given.
    pub fn new(
        establishment_id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        order_ratio: f64,
        hours: Vec<DaySchedule>,
        products: Vec<ProductInfo>,
        menus: Vec<MenuInfo>,
    ) -> Self {
        let products_index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let menus_index_by_id = menus
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let menus_index_by_name = menus
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.to_lowercase(), i))
            .collect();
        Self {
            establishment_id: establishment_id.into(),
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            order_ratio,
            hours,
            products,
            menus,
            products_index,
            menus_index_by_id,
            menus_index_by_name,
            built_at: Utc::now(),
        }
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&ProductInfo> {
        self.products_index.get(id).map(|&i| &self.products[i])
    }

    /// Looks up a menu by its canonical id.
    pub fn menu_by_id(&self, id: &str) -> Option<&MenuInfo> {
        self.menus_index_by_id.get(id).map(|&i| &self.menus[i])
    }

    /// Looks up a menu by lowercased human name.
    pub fn menu_by_name(&self, lowercase_name: &str) -> Option<&MenuInfo> {
        self.menus_index_by_name
            .get(lowercase_name)
            .map(|&i| &self.menus[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: &str) -> ProductInfo {
        ProductInfo {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: category.to_string(),
            price: 5.0,
        }
    }

    #[test]
    fn indices_resolve_products_and_menus() {
        let menu = MenuInfo {
            id: "menu-1".into(),
            name: "Combo Dulce".into(),
            price: 12.0,
            description: String::new(),
            composition: HashMap::new(),
            allowed_product_ids: HashSet::new(),
            options_by_category: HashMap::new(),
        };
        let snapshot = Snapshot::new(
            "est-1",
            "La Esquina",
            "Calle Mayor 1",
            "600000000",
            1.0,
            vec![],
            vec![product("p-1", "main"), product("p-2", "drink")],
            vec![menu],
        );

        assert_eq!(snapshot.product("p-2").unwrap().category, "drink");
        assert!(snapshot.product("p-9").is_none());
        assert_eq!(snapshot.menu_by_id("menu-1").unwrap().name, "Combo Dulce");
        assert_eq!(snapshot.menu_by_name("combo dulce").unwrap().id, "menu-1");
        assert!(snapshot.menu_by_name("Combo Dulce").is_none(), "index keys are lowercased");
    }
}
