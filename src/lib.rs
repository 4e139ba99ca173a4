//! # Comanda
//!
//! A conversational order-taking assistant for a small food establishment.
//! A language model drives the conversation; this crate supplies everything
//! around it:
//!
//! - **[model]**: Pure data structures — the catalog [`Snapshot`](model::Snapshot),
//!   order drafts, and chat messages.
//! - **[catalog]**: The [`SnapshotBuilder`](catalog::SnapshotBuilder) that
//!   assembles a consistent, immutable view of one establishment's hours,
//!   products, and menus.
//! - **[ordering]**: Validation of proposed order line-items against a
//!   snapshot, plus menu-reference coercion for model-supplied names.
//! - **[store]**: Traits for the hosted data store (catalog reads, order and
//!   message writes) and an in-memory implementation for tests and demos.
//! - **[chat]**: The [`ChatModel`](chat::ChatModel) session trait, the tool
//!   schemas exposed to the model, and a remote HTTP-backed implementation.
//! - **[conversation]**: The per-chat actor that debounces user input,
//!   drives model turns, and dispatches tool calls.
//! - **[runtime]**: Configuration, tracing setup, and system wiring.
//!
//! ## Concurrency Model
//!
//! Each conversation runs in its own Tokio task and processes requests
//! sequentially, so per-conversation state (cached snapshot, open order id)
//! needs no locks. The data store and the language model sit behind traits;
//! tests script them deterministically instead of spawning real services.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info COMANDA_API_KEY=... cargo run
//! ```

pub mod catalog;
pub mod chat;
pub mod conversation;
pub mod model;
pub mod ordering;
pub mod runtime;
pub mod store;
