//! Menu-reference coercion.
//!
//! The language model refers to menus by whatever it last saw: the real id,
//! the human name, or a synthesized pseudo-id like `MENU_Combo Dulce`. This
//! is a tolerance layer only; callers must still run full validation on the
//! resolved id.

use crate::model::Snapshot;

/// Prefix token the model sometimes invents when it means "menu id follows".
const MENU_PREFIXES: [&str; 2] = ["menu_", "menu "];

/// Resolves a caller-supplied menu reference to a canonical menu id.
///
/// A value that already matches a real id is returned unchanged. Otherwise
/// the value is lowercased, an optional leading menu prefix is stripped, and
/// the remainder is looked up by name. Returns `None` when nothing resolves.
pub fn coerce_menu_ref(snapshot: &Snapshot, raw: &str) -> Option<String> {
    if snapshot.menu_by_id(raw).is_some() {
        return Some(raw.to_string());
    }
    let lowered = raw.to_lowercase();
    if let Some(menu) = snapshot.menu_by_name(lowered.trim()) {
        return Some(menu.id.clone());
    }
    for prefix in MENU_PREFIXES {
        if let Some(rest) = lowered.strip_prefix(prefix) {
            return snapshot.menu_by_name(rest.trim()).map(|m| m.id.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuInfo;
    use std::collections::{HashMap, HashSet};

    fn snapshot() -> Snapshot {
        let menu = MenuInfo {
            id: "id-123".into(),
            name: "Combo Dulce".into(),
            price: 9.9,
            description: String::new(),
            composition: HashMap::new(),
            allowed_product_ids: HashSet::new(),
            options_by_category: HashMap::new(),
        };
        Snapshot::new("est-1", "La Esquina", "", "", 1.0, vec![], vec![], vec![menu])
    }

    #[test]
    fn real_id_passes_through_unchanged() {
        assert_eq!(coerce_menu_ref(&snapshot(), "id-123"), Some("id-123".into()));
    }

    #[test]
    fn prefixed_name_resolves_case_insensitively() {
        let snap = snapshot();
        assert_eq!(coerce_menu_ref(&snap, "MENU_Combo Dulce"), Some("id-123".into()));
        assert_eq!(coerce_menu_ref(&snap, "menu_combo dulce"), Some("id-123".into()));
        assert_eq!(coerce_menu_ref(&snap, "Menu Combo Dulce"), Some("id-123".into()));
    }

    #[test]
    fn bare_name_resolves() {
        assert_eq!(coerce_menu_ref(&snapshot(), "combo dulce"), Some("id-123".into()));
        assert_eq!(coerce_menu_ref(&snapshot(), "Combo Dulce"), Some("id-123".into()));
    }

    #[test]
    fn unrecognized_reference_resolves_to_none() {
        assert_eq!(coerce_menu_ref(&snapshot(), "menu fantasma"), None);
    }
}
