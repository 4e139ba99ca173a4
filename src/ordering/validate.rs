//! Fail-fast validation of proposed line-items.

use crate::model::{DetailDraft, Snapshot};
use crate::ordering::ValidationError;
use std::collections::HashMap;
use tracing::debug;

/// Checks every proposed detail against the snapshot, stopping at the first
/// violation. Purely a read over the snapshot; calling it twice with the
/// same input gives the same answer.
pub fn validate_details(
    snapshot: &Snapshot,
    details: &[DetailDraft],
) -> Result<(), ValidationError> {
    for detail in details {
        validate_detail(snapshot, detail)?;
    }
    debug!(count = details.len(), "Details validated");
    Ok(())
}

fn validate_detail(snapshot: &Snapshot, detail: &DetailDraft) -> Result<(), ValidationError> {
    if detail.quantity() == 0 {
        return Err(ValidationError::InvalidQuantity(0));
    }
    match detail {
        DetailDraft::Product { product_id, .. } => {
            if snapshot.product(product_id).is_none() {
                return Err(ValidationError::UnknownProduct(product_id.clone()));
            }
            Ok(())
        }
        DetailDraft::Menu {
            menu_id,
            selected_product_ids,
            ..
        } => validate_menu_selection(snapshot, menu_id, selected_product_ids),
    }
}

fn validate_menu_selection(
    snapshot: &Snapshot,
    menu_id: &str,
    selected: &[String],
) -> Result<(), ValidationError> {
    let menu = snapshot
        .menu_by_id(menu_id)
        .ok_or_else(|| ValidationError::UnknownMenu(menu_id.to_string()))?;

    let mut tally: HashMap<&str, u32> = HashMap::new();
    for product_id in selected {
        let product = snapshot.product(product_id).ok_or_else(|| {
            ValidationError::DisallowedProduct {
                menu: menu.id.clone(),
                product: product_id.clone(),
            }
        })?;
        if !menu.allowed_product_ids.contains(product_id) {
            return Err(ValidationError::DisallowedProduct {
                menu: menu.id.clone(),
                product: product_id.clone(),
            });
        }
        *tally.entry(product.category.as_str()).or_default() += 1;
    }

    // Exact match per required category. Selected categories outside the
    // composition are ignored.
    for (category, &expected) in &menu.composition {
        let actual = tally.get(category.as_str()).copied().unwrap_or(0);
        if actual != expected {
            return Err(ValidationError::IncompleteSelection {
                menu: menu.id.clone(),
                category: category.clone(),
                expected,
                actual,
            });
        }
    }
    Ok(())
}
