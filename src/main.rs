//! Line-oriented CLI for the order-taking assistant.
//!
//! Reads user lines from stdin, feeds them into the conversation actor, and
//! prints assistant replies as they arrive. Typing `salir` flushes any
//! pending debounced input through a final turn and exits cleanly.
//!
//! The demo binary runs against an in-memory catalog; the chat model is the
//! real hosted service, so `COMANDA_API_KEY` must be set.

use comanda::chat::RemoteChatModel;
use comanda::runtime::{setup_tracing, AssistantSystem, Config};
use comanda::store::{EstablishmentRow, HoursRow, InMemoryStore, MenuRow, ProductRow, SessionRow};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const EXIT_WORD: &str = "salir";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    info!(model = %config.model, establishment = %config.establishment_id, "Starting");

    let store = Arc::new(demo_store(&config.establishment_id));
    let model = RemoteChatModel::new(
        config.chat_url.clone(),
        config.api_key.clone(),
        config.model.clone(),
    );
    let (system, mut replies) = AssistantSystem::start(
        "cli",
        config.establishment_id.clone(),
        config.debounce,
        model,
        store.clone(),
        store.clone(),
        store,
    );

    // Assistant replies print from their own task so slow turns never block
    // the input prompt.
    let printer = tokio::spawn(async move {
        while let Some(text) = replies.recv().await {
            println!("{text}");
        }
    });

    println!("Escribe tu pedido ('{EXIT_WORD}' para terminar).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case(EXIT_WORD) {
            break;
        }
        if system.client.send_input(line).await.is_err() {
            break;
        }
    }

    system.shutdown().await?;
    printer.await.map_err(|e| e.to_string())?;
    println!("¡Hasta pronto!");
    Ok(())
}

/// Seed catalog for the demo binary.
fn demo_store(establishment_id: &str) -> InMemoryStore {
    let store = InMemoryStore::new();
    store.seed_establishment(EstablishmentRow {
        id: establishment_id.to_string(),
        name: "La Esquina".into(),
        address: "Calle Mayor 1".into(),
        phone: "600 000 000".into(),
        order_ratio: 0.9,
    });
    store.seed_hours(
        establishment_id,
        vec![
            HoursRow {
                day: "lunes".into(),
                open: true,
                sessions: vec![SessionRow { from: "12:00".into(), to: "16:00".into() }],
            },
            HoursRow {
                day: "martes".into(),
                open: true,
                sessions: vec![
                    SessionRow { from: "12:00".into(), to: "16:00".into() },
                    SessionRow { from: "20:00".into(), to: "23:30".into() },
                ],
            },
            HoursRow { day: "miércoles".into(), open: false, sessions: vec![] },
        ],
    );
    store.seed_products(
        establishment_id,
        vec![
            ProductRow {
                id: "p-bocadillo".into(),
                name: "Bocadillo de calamares".into(),
                category: "main".into(),
                price: "6.50".into(),
            },
            ProductRow {
                id: "p-tortilla".into(),
                name: "Tortilla de patatas".into(),
                category: "main".into(),
                price: "5.80".into(),
            },
            ProductRow {
                id: "p-agua".into(),
                name: "Agua mineral".into(),
                category: "drink".into(),
                price: "1.20".into(),
            },
            ProductRow {
                id: "p-refresco".into(),
                name: "Refresco".into(),
                category: "drink".into(),
                price: "1.80".into(),
            },
        ],
    );
    store.seed_menus(
        establishment_id,
        vec![MenuRow {
            id: Some("menu-del-dia".into()),
            name: "Combo del Día".into(),
            price: "8.90".into(),
            description: "Un principal y una bebida".into(),
            composition: HashMap::from([("main".into(), 1), ("drink".into(), 1)]),
            allowed_product_ids: vec![
                "p-bocadillo".into(),
                "p-tortilla".into(),
                "p-agua".into(),
                "p-refresco".into(),
            ],
        }],
    );
    store
}
