//! The stateful chat-session abstraction.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Correlation id assigned by the model; echoed back in [`ToolResult`].
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// The structured payload answering one [`ToolCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    pub payload: Value,
}

/// What the model produced for one exchange: either user-facing text, or a
/// batch of tool calls that must be answered before the turn can finish.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

/// Chat-service failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("chat service unreachable: {0}")]
    Transport(String),
    #[error("chat service returned an unusable reply: {0}")]
    BadReply(String),
}

/// A stateful chat session with a language model.
///
/// Implementations own the running transcript: every `send_user` and
/// `send_tool_results` call extends the same conversation. One session per
/// chat id; sessions are driven from the conversation actor only, so `&mut`
/// access is natural.
#[async_trait]
pub trait ChatModel: Send {
    /// Sends a user message and returns the model's next reply.
    async fn send_user(&mut self, text: &str) -> Result<ModelReply, ChatError>;

    /// Feeds tool results back into the in-flight turn and returns the
    /// model's next reply.
    async fn send_tool_results(&mut self, results: Vec<ToolResult>)
        -> Result<ModelReply, ChatError>;
}
