//! Persisted conversation messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One row in the conversation log. `parts` keeps the structured shape of
/// what crossed the wire (plain text, tool calls, tool results) so a session
/// can be replayed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: ChatRole,
    pub parts: Vec<Value>,
    pub at: DateTime<Utc>,
}

impl StoredMessage {
    /// A plain-text message from the given role, stamped now.
    pub fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Value::String(content.into())],
            at: Utc::now(),
        }
    }

    /// A structured message (tool calls or tool results), stamped now.
    pub fn structured(role: ChatRole, parts: Vec<Value>) -> Self {
        Self {
            role,
            parts,
            at: Utc::now(),
        }
    }
}
