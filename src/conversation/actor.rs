//! The conversation actor: debounced input, serialized turns.
//!
//! The actor owns everything mutable about one conversation and processes
//! requests in a single loop. Rapid consecutive inputs are coalesced by a
//! trailing-edge debounce timer: each input resets the deadline, and when
//! the quiet period elapses the buffered inputs run as one model turn, in
//! arrival order, space-joined. Turns execute inline in the loop, so two
//! turns for the same chat can never overlap.

use crate::conversation::{
    run_turn, ConversationState, Session, ToolDeps,
};
use crate::chat::ChatModel;
use crate::store::MessageStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{error, info};

/// Fallback reply when a turn fails unexpectedly; the conversation itself
/// survives.
const APOLOGY: &str = "Lo siento, ha ocurrido un problema. ¿Puedes repetirme lo último?";

/// Requests accepted by a [`ConversationActor`].
#[derive(Debug)]
pub enum ConversationRequest {
    /// A line of user input. Buffered until the debounce window closes.
    Input(String),
    /// Flush pending input, run the final turn if any, and stop.
    Close { respond_to: oneshot::Sender<()> },
}

/// The server half of one conversation.
pub struct ConversationActor<M: ChatModel> {
    receiver: mpsc::Receiver<ConversationRequest>,
    outbox: mpsc::Sender<String>,
    model: M,
    session: Session,
    deps: ToolDeps,
    messages: Arc<dyn MessageStore>,
    debounce: Duration,
    buffer: Vec<String>,
}

impl<M: ChatModel> ConversationActor<M> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        receiver: mpsc::Receiver<ConversationRequest>,
        outbox: mpsc::Sender<String>,
        model: M,
        session: Session,
        deps: ToolDeps,
        messages: Arc<dyn MessageStore>,
        debounce: Duration,
    ) -> Self {
        Self {
            receiver,
            outbox,
            model,
            session,
            deps,
            messages,
            debounce,
            buffer: Vec::new(),
        }
    }

    /// Runs the conversation loop until the client closes it or hangs up.
    pub async fn run(mut self) {
        info!(chat_id = %self.session.chat_id, "Conversation started");
        let mut deadline: Option<Instant> = None;
        loop {
            // The sleep target only matters when a deadline is armed; the
            // branch is disabled otherwise.
            let sleep_target = deadline.unwrap_or_else(Instant::now);
            tokio::select! {
                request = self.receiver.recv() => match request {
                    Some(ConversationRequest::Input(text)) => {
                        self.buffer.push(text);
                        deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(ConversationRequest::Close { respond_to }) => {
                        self.flush().await;
                        self.session.state = ConversationState::Closed;
                        let _ = respond_to.send(());
                        break;
                    }
                    None => {
                        self.flush().await;
                        break;
                    }
                },
                _ = sleep_until(sleep_target), if deadline.is_some() => {
                    deadline = None;
                    self.flush().await;
                }
            }
        }
        info!(chat_id = %self.session.chat_id, "Conversation ended");
    }

    /// Joins buffered inputs into one turn and emits the reply.
    async fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let input = self.buffer.join(" ");
        self.buffer.clear();
        let reply = match run_turn(
            &mut self.model,
            &mut self.session,
            &self.deps,
            &self.messages,
            &input,
        )
        .await
        {
            Ok(text) => text,
            Err(e) => {
                error!(chat_id = %self.session.chat_id, error = %e, "Turn failed");
                APOLOGY.to_string()
            }
        };
        let _ = self.outbox.send(reply).await;
    }
}
