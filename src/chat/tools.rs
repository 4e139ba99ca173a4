//! The three callable tools: their schemas and the typed requests parsed
//! from incoming calls.
//!
//! Tool arguments arrive as loose JSON chosen by the model. They are parsed
//! into the [`ToolRequest`] tagged enum at this boundary; malformed calls
//! become [`ToolParseError`]s that the dispatcher reports back to the model
//! instead of letting bad shapes reach business logic.

use crate::chat::ToolCall;
use crate::model::DetailDraft;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const TOOL_GET_SNAPSHOT: &str = "get_establishment_snapshot";
pub const TOOL_ADD_ORDER: &str = "add_order";
pub const TOOL_ADD_DETAILS: &str = "add_details_order";

/// Schema advertised to the model for one callable tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON-schema object for the arguments.
    pub parameters: Value,
}

/// The tool surface exposed to every chat session.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: TOOL_GET_SNAPSHOT,
            description: "Fetch the establishment's current hours, products, and menus.",
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolSpec {
            name: TOOL_ADD_ORDER,
            description: "Open a new order for this conversation. Returns the \
                          existing order id if one is already open.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "pickup": { "type": "boolean" },
                    "address": { "type": "string" }
                },
                "required": ["pickup"]
            }),
        },
        ToolSpec {
            name: TOOL_ADD_DETAILS,
            description: "Add line-items to the open order. Each detail is a \
                          product or a menu with its selected products.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "details": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "kind": { "type": "string", "enum": ["product", "menu"] },
                                "product_id": { "type": "string" },
                                "menu_id": { "type": "string" },
                                "selected_product_ids": {
                                    "type": "array",
                                    "items": { "type": "string" }
                                },
                                "quantity": { "type": "integer", "minimum": 1 }
                            },
                            "required": ["kind", "quantity"]
                        }
                    }
                },
                "required": ["details"]
            }),
        },
    ]
}

/// A tool call after boundary validation, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    GetSnapshot,
    AddOrder {
        pickup: bool,
        address: Option<String>,
    },
    AddDetails {
        details: Vec<DetailDraft>,
    },
}

/// Why a tool call could not be parsed into a [`ToolRequest`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolParseError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

#[derive(Deserialize)]
struct AddOrderArgs {
    pickup: bool,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Deserialize)]
struct AddDetailsArgs {
    details: Vec<DetailDraft>,
}

impl ToolRequest {
    /// Parses a raw [`ToolCall`] into a typed request.
    pub fn parse(call: &ToolCall) -> Result<Self, ToolParseError> {
        let invalid = |message: String| ToolParseError::InvalidArguments {
            tool: call.name.clone(),
            message,
        };
        match call.name.as_str() {
            TOOL_GET_SNAPSHOT => Ok(ToolRequest::GetSnapshot),
            TOOL_ADD_ORDER => {
                let args: AddOrderArgs = serde_json::from_value(call.arguments.clone())
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(ToolRequest::AddOrder {
                    pickup: args.pickup,
                    address: args.address,
                })
            }
            TOOL_ADD_DETAILS => {
                let args: AddDetailsArgs = serde_json::from_value(call.arguments.clone())
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(ToolRequest::AddDetails {
                    details: args.details,
                })
            }
            other => Err(ToolParseError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments,
        }
    }

    #[test]
    fn parses_snapshot_request() {
        let req = ToolRequest::parse(&call(TOOL_GET_SNAPSHOT, json!({}))).unwrap();
        assert_eq!(req, ToolRequest::GetSnapshot);
    }

    #[test]
    fn parses_add_order_with_optional_address() {
        let req = ToolRequest::parse(&call(TOOL_ADD_ORDER, json!({ "pickup": true }))).unwrap();
        assert_eq!(req, ToolRequest::AddOrder { pickup: true, address: None });

        let req = ToolRequest::parse(&call(
            TOOL_ADD_ORDER,
            json!({ "pickup": false, "address": "Calle Luna 5" }),
        ))
        .unwrap();
        assert_eq!(
            req,
            ToolRequest::AddOrder {
                pickup: false,
                address: Some("Calle Luna 5".into())
            }
        );
    }

    #[test]
    fn parses_tagged_details() {
        let req = ToolRequest::parse(&call(
            TOOL_ADD_DETAILS,
            json!({
                "details": [
                    { "kind": "product", "product_id": "p-1", "quantity": 2 },
                    {
                        "kind": "menu",
                        "menu_id": "menu-1",
                        "selected_product_ids": ["p-1", "p-2"],
                        "quantity": 1
                    }
                ]
            }),
        ))
        .unwrap();
        match req {
            ToolRequest::AddDetails { details } => {
                assert_eq!(details.len(), 2);
                assert_eq!(
                    details[0],
                    DetailDraft::Product { product_id: "p-1".into(), quantity: 2 }
                );
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_tool_and_bad_arguments() {
        assert_eq!(
            ToolRequest::parse(&call("drop_tables", json!({}))),
            Err(ToolParseError::UnknownTool("drop_tables".into()))
        );
        assert!(matches!(
            ToolRequest::parse(&call(TOOL_ADD_ORDER, json!({ "address": 7 }))),
            Err(ToolParseError::InvalidArguments { .. })
        ));
        // A detail naming both a product and a menu has no valid tag shape.
        assert!(matches!(
            ToolRequest::parse(&call(
                TOOL_ADD_DETAILS,
                json!({ "details": [{ "product_id": "p-1", "menu_id": "m-1", "quantity": 1 }] })
            )),
            Err(ToolParseError::InvalidArguments { .. })
        ));
    }
}
