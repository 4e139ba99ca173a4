//! Environment-based configuration.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ESTABLISHMENT: &str = "est-demo";
const DEFAULT_DEBOUNCE_MS: u64 = 1500;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Without a chat-service credential no session is possible, so this is
    /// fatal at startup.
    #[error("missing required environment variable {0}")]
    MissingCredential(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub chat_url: String,
    pub model: String,
    pub establishment_id: String,
    pub debounce: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("COMANDA_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential("COMANDA_API_KEY"))?;
        let debounce_ms = match std::env::var("COMANDA_DEBOUNCE_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "COMANDA_DEBOUNCE_MS",
                value: raw,
            })?,
            Err(_) => DEFAULT_DEBOUNCE_MS,
        };
        Ok(Self {
            api_key,
            chat_url: env_or("COMANDA_CHAT_URL", DEFAULT_CHAT_URL),
            model: env_or("COMANDA_MODEL", DEFAULT_MODEL),
            establishment_id: env_or("COMANDA_ESTABLISHMENT", DEFAULT_ESTABLISHMENT),
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
