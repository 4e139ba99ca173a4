//! Scripted chat model for tests.
//!
//! The same idea as a mock actor client: instead of spinning up a real
//! model, tests queue the replies the "model" should give and afterwards
//! inspect what was sent to it.
//!
//! ```ignore
//! let mut script = ChatScript::new();
//! script.reply_with_tool_calls(vec![snapshot_call()]);
//! script.reply_with_text("¡Aquí tienes la carta!");
//! let model = script.model();
//! // drive the conversation, then:
//! script.verify();
//! ```

use crate::chat::{ChatError, ChatModel, ModelReply, ToolResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the conversation layer sent to the model, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SentItem {
    User(String),
    ToolResults(Vec<ToolResult>),
}

#[derive(Default)]
struct Shared {
    replies: VecDeque<Result<ModelReply, ChatError>>,
    sent: Vec<SentItem>,
}

/// Builder/recorder for a [`ScriptedChatModel`].
#[derive(Clone, Default)]
pub struct ChatScript {
    shared: Arc<Mutex<Shared>>,
}

impl ChatScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a plain-text reply.
    pub fn reply_with_text(&self, text: impl Into<String>) -> &Self {
        self.shared
            .lock()
            .unwrap()
            .replies
            .push_back(Ok(ModelReply::Text(text.into())));
        self
    }

    /// Queues a tool-call batch reply.
    pub fn reply_with_tool_calls(&self, calls: Vec<crate::chat::ToolCall>) -> &Self {
        self.shared
            .lock()
            .unwrap()
            .replies
            .push_back(Ok(ModelReply::ToolCalls(calls)));
        self
    }

    /// Queues a chat-service failure.
    pub fn reply_with_error(&self, error: ChatError) -> &Self {
        self.shared.lock().unwrap().replies.push_back(Err(error));
        self
    }

    /// The model to hand to the conversation under test.
    pub fn model(&self) -> ScriptedChatModel {
        ScriptedChatModel {
            shared: self.shared.clone(),
        }
    }

    /// Everything the conversation sent, in order.
    pub fn sent(&self) -> Vec<SentItem> {
        self.shared.lock().unwrap().sent.clone()
    }

    /// Panics if scripted replies were left unconsumed.
    pub fn verify(&self) {
        let remaining = self.shared.lock().unwrap().replies.len();
        if remaining > 0 {
            panic!("{remaining} scripted replies were never requested");
        }
    }
}

/// [`ChatModel`] implementation that plays back a [`ChatScript`].
pub struct ScriptedChatModel {
    shared: Arc<Mutex<Shared>>,
}

impl ScriptedChatModel {
    fn next_reply(&self) -> Result<ModelReply, ChatError> {
        self.shared
            .lock()
            .unwrap()
            .replies
            .pop_front()
            .unwrap_or_else(|| panic!("chat script exhausted"))
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn send_user(&mut self, text: &str) -> Result<ModelReply, ChatError> {
        self.shared
            .lock()
            .unwrap()
            .sent
            .push(SentItem::User(text.to_string()));
        self.next_reply()
    }

    async fn send_tool_results(
        &mut self,
        results: Vec<ToolResult>,
    ) -> Result<ModelReply, ChatError> {
        self.shared
            .lock()
            .unwrap()
            .sent
            .push(SentItem::ToolResults(results));
        self.next_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plays_back_replies_and_records_sends() {
        let script = ChatScript::new();
        script.reply_with_text("hola");
        let mut model = script.model();

        let reply = model.send_user("buenas").await.unwrap();
        assert_eq!(reply, ModelReply::Text("hola".into()));
        assert_eq!(script.sent(), vec![SentItem::User("buenas".into())]);
        script.verify();
    }
}
