//! Tool-call dispatch: the boundary between the model and business logic.
//!
//! Every call is parsed into a typed [`ToolRequest`] first; every outcome,
//! success or failure, becomes a structured JSON payload sent back into the
//! model turn. Nothing here panics or propagates an error upward — a failed
//! tool call is information for the model, not a crash.

use crate::catalog::{CatalogError, SnapshotBuilder};
use crate::chat::{ToolCall, ToolRequest};
use crate::conversation::{ConversationState, Session};
use crate::model::{DetailDraft, NewOrder, OrderDetailRow};
use crate::ordering::{coerce_menu_ref, validate_details, ValidationError};
use crate::store::{OrderStore, StoreError};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Collaborators the dispatcher needs.
pub struct ToolDeps {
    pub builder: SnapshotBuilder,
    pub orders: Arc<dyn OrderStore>,
}

/// Executes one tool call against the session, returning its result payload.
#[instrument(skip_all, fields(chat_id = %session.chat_id, tool = %call.name))]
pub async fn dispatch(session: &mut Session, deps: &ToolDeps, call: &ToolCall) -> Value {
    let request = match ToolRequest::parse(call) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Tool call rejected at parse");
            return error_payload("invalid_tool_call", &e.to_string());
        }
    };
    match request {
        ToolRequest::GetSnapshot => get_snapshot(session, deps).await,
        ToolRequest::AddOrder { pickup, address } => {
            add_order(session, deps, pickup, address).await
        }
        ToolRequest::AddDetails { details } => add_details(session, deps, details).await,
    }
}

async fn get_snapshot(session: &mut Session, deps: &ToolDeps) -> Value {
    if let Some(snapshot) = &session.snapshot {
        info!("Snapshot served from session cache");
        return ok_payload(json!({ "snapshot": snapshot.as_ref() }));
    }
    match deps.builder.build(&session.establishment_id).await {
        Ok(snapshot) => {
            let snapshot = Arc::new(snapshot);
            session.snapshot = Some(snapshot.clone());
            if session.state == ConversationState::AwaitingSnapshot {
                session.state = ConversationState::Ordering;
            }
            ok_payload(json!({ "snapshot": snapshot.as_ref() }))
        }
        Err(e) => {
            warn!(error = %e, "Snapshot build failed");
            let code = match e {
                CatalogError::NotFound(_) => "establishment_not_found",
                CatalogError::DataUnavailable(_) => "data_unavailable",
                CatalogError::InvalidMenu(_) => "invalid_menu",
            };
            error_payload(code, &e.to_string())
        }
    }
}

async fn add_order(
    session: &mut Session,
    deps: &ToolDeps,
    pickup: bool,
    address: Option<String>,
) -> Value {
    // Idempotent per session: a second add_order returns the open order
    // instead of creating a duplicate.
    if let Some(order_id) = &session.current_order_id {
        info!(order_id = %order_id, "Order already open, reusing");
        return ok_payload(json!({ "order_id": order_id, "existing": true }));
    }
    let address = address.filter(|a| !a.trim().is_empty());
    if !pickup && address.is_none() {
        return error_payload("address_required", "delivery orders need an address");
    }
    let order = NewOrder {
        chat_id: session.chat_id.clone(),
        establishment_id: session.establishment_id.clone(),
        pickup,
        address,
    };
    match deps.orders.insert_order(order).await {
        Ok(record) => {
            // Only a confirmed insert moves the pointer.
            session.current_order_id = Some(record.id.clone());
            info!(order_id = %record.id, "Order opened");
            ok_payload(json!({ "order_id": record.id, "existing": false }))
        }
        Err(e) => {
            warn!(error = %e, "Order insert failed");
            store_error_payload(e)
        }
    }
}

async fn add_details(session: &mut Session, deps: &ToolDeps, details: Vec<DetailDraft>) -> Value {
    let Some(order_id) = session.current_order_id.clone() else {
        return error_payload("no_open_order", "no order is open for this conversation");
    };
    let Some(snapshot) = session.snapshot.clone() else {
        // Reachable only if an order was opened without a snapshot fetch.
        return error_payload("snapshot_required", "fetch the establishment snapshot first");
    };

    // The tool schema carries no order reference at all; details always
    // attach to the session's open order.
    let details: Vec<DetailDraft> = details
        .into_iter()
        .map(|d| match d {
            DetailDraft::Menu {
                menu_id,
                selected_product_ids,
                quantity,
            } => {
                let menu_id = coerce_menu_ref(&snapshot, &menu_id).unwrap_or(menu_id);
                DetailDraft::Menu {
                    menu_id,
                    selected_product_ids,
                    quantity,
                }
            }
            product => product,
        })
        .collect();

    if let Err(e) = validate_details(&snapshot, &details) {
        warn!(error = %e, "Details rejected");
        return validation_error_payload(e);
    }

    let rows: Vec<OrderDetailRow> = details
        .into_iter()
        .map(|detail| OrderDetailRow {
            order_id: order_id.clone(),
            detail,
        })
        .collect();
    let count = rows.len();
    match deps.orders.insert_details(rows).await {
        Ok(()) => {
            info!(order_id = %order_id, count, "Details persisted");
            ok_payload(json!({ "order_id": order_id, "details_added": count }))
        }
        Err(e) => {
            warn!(error = %e, "Details insert failed");
            store_error_payload(e)
        }
    }
}

fn ok_payload(data: Value) -> Value {
    json!({ "ok": true, "data": data })
}

fn error_payload(code: &str, message: &str) -> Value {
    json!({ "ok": false, "error": { "code": code, "message": message } })
}

fn store_error_payload(e: StoreError) -> Value {
    match e {
        StoreError::Unavailable(_) => error_payload("store_unavailable", &e.to_string()),
        StoreError::Rejected { .. } => error_payload("store_rejected", &e.to_string()),
    }
}

fn validation_error_payload(e: ValidationError) -> Value {
    let code = match e {
        ValidationError::UnknownProduct(_) => "unknown_product",
        ValidationError::UnknownMenu(_) => "unknown_menu",
        ValidationError::DisallowedProduct { .. } => "disallowed_product",
        ValidationError::IncompleteSelection { .. } => "incomplete_selection",
        ValidationError::InvalidQuantity(_) => "invalid_quantity",
    };
    error_payload(code, &e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::TOOL_ADD_DETAILS;
    use crate::store::{EstablishmentRow, InMemoryStore, MenuRow, ProductRow};
    use std::collections::HashMap;

    fn deps_with_catalog() -> (ToolDeps, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        store.seed_establishment(EstablishmentRow {
            id: "est-1".into(),
            name: "La Esquina".into(),
            address: "Calle Mayor 1".into(),
            phone: "600000000".into(),
            order_ratio: 1.0,
        });
        store.seed_products(
            "est-1",
            vec![
                ProductRow {
                    id: "p-main".into(),
                    name: "Bocadillo".into(),
                    category: "main".into(),
                    price: "6.50".into(),
                },
                ProductRow {
                    id: "p-drink".into(),
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
                description: String::new(),
                composition: HashMap::from([("main".into(), 1), ("drink".into(), 1)]),
                allowed_product_ids: vec!["p-main".into(), "p-drink".into()],
            }],
        );
        let deps = ToolDeps {
            builder: SnapshotBuilder::new(store.clone()),
            orders: store.clone(),
        };
        (deps, store)
    }

    fn call(name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments,
        }
    }

    async fn open_session(deps: &ToolDeps) -> Session {
        let mut session = Session::new("chat-1", "est-1");
        let payload = dispatch(
            &mut session,
            deps,
            &call(crate::chat::TOOL_GET_SNAPSHOT, json!({})),
        )
        .await;
        assert_eq!(payload["ok"], json!(true));
        session
    }

    #[tokio::test]
    async fn snapshot_fetch_moves_state_to_ordering_and_caches() {
        let (deps, _store) = deps_with_catalog();
        let session = open_session(&deps).await;
        assert_eq!(session.state, ConversationState::Ordering);
        assert!(session.snapshot.is_some());
    }

    #[tokio::test]
    async fn snapshot_not_found_keeps_state() {
        let (deps, _store) = deps_with_catalog();
        let mut session = Session::new("chat-1", "est-404");
        let payload = dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_GET_SNAPSHOT, json!({})),
        )
        .await;
        assert_eq!(payload["ok"], json!(false));
        assert_eq!(payload["error"]["code"], json!("establishment_not_found"));
        assert_eq!(session.state, ConversationState::AwaitingSnapshot);
    }

    #[tokio::test]
    async fn add_order_is_idempotent_per_session() {
        let (deps, store) = deps_with_catalog();
        let mut session = open_session(&deps).await;

        let first = dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_ADD_ORDER, json!({ "pickup": true })),
        )
        .await;
        let second = dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_ADD_ORDER, json!({ "pickup": true })),
        )
        .await;

        assert_eq!(first["data"]["order_id"], second["data"]["order_id"]);
        assert_eq!(first["data"]["existing"], json!(false));
        assert_eq!(second["data"]["existing"], json!(true));
        assert_eq!(store.order_insert_count(), 1);
    }

    #[tokio::test]
    async fn delivery_without_address_is_rejected() {
        let (deps, store) = deps_with_catalog();
        let mut session = open_session(&deps).await;
        let payload = dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_ADD_ORDER, json!({ "pickup": false })),
        )
        .await;
        assert_eq!(payload["error"]["code"], json!("address_required"));
        assert_eq!(store.order_insert_count(), 0);
        assert!(session.current_order_id.is_none());
    }

    #[tokio::test]
    async fn failed_insert_leaves_order_pointer_unset() {
        let (deps, store) = deps_with_catalog();
        let mut session = open_session(&deps).await;
        store.reject_writes(500, "boom");
        let payload = dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_ADD_ORDER, json!({ "pickup": true })),
        )
        .await;
        assert_eq!(payload["error"]["code"], json!("store_rejected"));
        assert!(session.current_order_id.is_none());
    }

    #[tokio::test]
    async fn details_without_open_order_do_not_insert() {
        let (deps, store) = deps_with_catalog();
        let mut session = open_session(&deps).await;
        let payload = dispatch(
            &mut session,
            &deps,
            &call(
                TOOL_ADD_DETAILS,
                json!({ "details": [
                    { "kind": "product", "product_id": "p-main", "quantity": 1 }
                ]}),
            ),
        )
        .await;
        assert_eq!(payload["error"]["code"], json!("no_open_order"));
        assert_eq!(store.detail_insert_count(), 0);
    }

    #[tokio::test]
    async fn details_are_coerced_validated_and_attached_to_open_order() {
        let (deps, store) = deps_with_catalog();
        let mut session = open_session(&deps).await;
        dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_ADD_ORDER, json!({ "pickup": true })),
        )
        .await;

        let payload = dispatch(
            &mut session,
            &deps,
            &call(
                TOOL_ADD_DETAILS,
                json!({ "details": [{
                    "kind": "menu",
                    "menu_id": "MENU_Combo Dulce",
                    "selected_product_ids": ["p-main", "p-drink"],
                    "quantity": 1
                }]}),
            ),
        )
        .await;

        assert_eq!(payload["ok"], json!(true), "payload: {payload}");
        assert_eq!(payload["data"]["details_added"], json!(1));
        let rows = store.stored_details();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id, session.current_order_id.clone().unwrap());
        match &rows[0].detail {
            DetailDraft::Menu { menu_id, .. } => assert_eq!(menu_id, "menu-1"),
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_selection_reports_error_and_persists_nothing() {
        let (deps, store) = deps_with_catalog();
        let mut session = open_session(&deps).await;
        dispatch(
            &mut session,
            &deps,
            &call(crate::chat::TOOL_ADD_ORDER, json!({ "pickup": true })),
        )
        .await;

        let payload = dispatch(
            &mut session,
            &deps,
            &call(
                TOOL_ADD_DETAILS,
                json!({ "details": [{
                    "kind": "menu",
                    "menu_id": "menu-1",
                    "selected_product_ids": ["p-main"],
                    "quantity": 1
                }]}),
            ),
        )
        .await;

        assert_eq!(payload["error"]["code"], json!("incomplete_selection"));
        assert_eq!(store.detail_insert_count(), 0);
    }
}
