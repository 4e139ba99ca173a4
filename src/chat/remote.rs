//! HTTP-backed chat session against an OpenAI-style completions endpoint.
//!
//! Keeps the running transcript client-side and replays it on every request,
//! which is how the hosted service expects stateless HTTP chat to work. Tool
//! schemas from [`tool_specs`](crate::chat::tool_specs) ride along on each
//! request.

use crate::chat::{tool_specs, ChatError, ChatModel, ModelReply, ToolCall, ToolResult, ToolSpec};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// The assistant's standing instructions. Business wording is deliberately
/// generic; the catalog itself is what the model works from.
const SYSTEM_PROMPT: &str = "You are an order-taking assistant for a food \
establishment. Fetch the establishment snapshot before discussing the \
catalog, confirm the order with the customer, and only use the provided \
tools to create orders and add line-items.";

pub struct RemoteChatModel {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    tools: Vec<ToolSpec>,
    /// Full transcript in wire format, replayed on every request.
    messages: Vec<Value>,
}

impl RemoteChatModel {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
            tools: tool_specs(),
            messages: vec![json!({ "role": "system", "content": SYSTEM_PROMPT })],
        }
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn complete(&mut self) -> Result<ModelReply, ChatError> {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect();
        let body = json!({
            "model": self.model,
            "messages": self.messages,
            "tools": tools,
        });

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Transport(format!("status {status}")));
        }
        let completion: Completion = response
            .json()
            .await
            .map_err(|e| ChatError::BadReply(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::BadReply("no choices".into()))?;
        debug!(finish_reason = ?choice.finish_reason, "Completion received");

        if let Some(calls) = choice.message.tool_calls.filter(|c| !c.is_empty()) {
            // Keep the assistant turn in the transcript so tool results can
            // reference it.
            self.messages.push(json!({
                "role": "assistant",
                "content": choice.message.content,
                "tool_calls": calls.iter().map(|c| json!({
                    "id": c.id,
                    "type": "function",
                    "function": { "name": c.function.name, "arguments": c.function.arguments },
                })).collect::<Vec<_>>(),
            }));
            let calls = calls
                .into_iter()
                .map(|c| {
                    let arguments: Value = serde_json::from_str(&c.function.arguments)
                        .map_err(|e| ChatError::BadReply(format!("tool arguments: {e}")))?;
                    Ok(ToolCall {
                        id: c.id,
                        name: c.function.name,
                        arguments,
                    })
                })
                .collect::<Result<Vec<_>, ChatError>>()?;
            return Ok(ModelReply::ToolCalls(calls));
        }

        let text = choice
            .message
            .content
            .ok_or_else(|| ChatError::BadReply("empty assistant message".into()))?;
        self.messages
            .push(json!({ "role": "assistant", "content": text }));
        Ok(ModelReply::Text(text))
    }
}

#[async_trait]
impl ChatModel for RemoteChatModel {
    async fn send_user(&mut self, text: &str) -> Result<ModelReply, ChatError> {
        self.messages.push(json!({ "role": "user", "content": text }));
        self.complete().await
    }

    async fn send_tool_results(
        &mut self,
        results: Vec<ToolResult>,
    ) -> Result<ModelReply, ChatError> {
        for result in results {
            self.messages.push(json!({
                "role": "tool",
                "tool_call_id": result.call_id,
                "content": result.payload.to_string(),
            }));
        }
        self.complete().await
    }
}

// Wire types for the completion response.

#[derive(Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded argument object, as the service sends it.
    arguments: String,
}
