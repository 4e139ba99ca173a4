//! One model turn: user text in, assistant text out.
//!
//! A turn may involve several round-trips with the model: each tool-call
//! batch is executed in order (earlier calls can change session state that
//! later calls depend on) and the results are fed back until the model
//! yields plain text.

use crate::chat::{ChatModel, ModelReply, ToolResult};
use crate::conversation::{dispatch, ConversationError, Session, ToolDeps};
use crate::model::{ChatRole, StoredMessage};
use crate::store::MessageStore;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Drives one debounced input through the model until it produces text.
#[instrument(skip_all, fields(chat_id = %session.chat_id))]
pub async fn run_turn<M: ChatModel>(
    model: &mut M,
    session: &mut Session,
    deps: &ToolDeps,
    messages: &Arc<dyn MessageStore>,
    input: &str,
) -> Result<String, ConversationError> {
    log_message(messages, session, StoredMessage::text(ChatRole::User, input)).await;

    let mut reply = model.send_user(input).await?;
    loop {
        match reply {
            ModelReply::Text(text) => {
                log_message(
                    messages,
                    session,
                    StoredMessage::text(ChatRole::Assistant, text.clone()),
                )
                .await;
                return Ok(text);
            }
            ModelReply::ToolCalls(calls) => {
                debug!(count = calls.len(), "Executing tool calls");
                let mut results = Vec::with_capacity(calls.len());
                // Sequential on purpose: add_order must settle before a
                // later add_details_order in the same batch sees the order.
                for call in &calls {
                    let payload = dispatch(session, deps, call).await;
                    results.push(ToolResult {
                        call_id: call.id.clone(),
                        payload,
                    });
                }
                let parts = results
                    .iter()
                    .map(|r| json!({ "call_id": r.call_id, "result": r.payload }))
                    .collect();
                log_message(
                    messages,
                    session,
                    StoredMessage::structured(ChatRole::Tool, parts),
                )
                .await;
                reply = model.send_tool_results(results).await?;
            }
        }
    }
}

/// Message-log persistence is best-effort; a failed append never breaks the
/// turn that produced it.
async fn log_message(messages: &Arc<dyn MessageStore>, session: &Session, message: StoredMessage) {
    if let Err(e) = messages.append_message(&session.chat_id, message).await {
        warn!(chat_id = %session.chat_id, error = %e, "Message append failed");
    }
}
