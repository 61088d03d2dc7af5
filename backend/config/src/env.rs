//! Environment loading for `RelayConfig`.
//!
//! Empty variables are treated as unset.

use std::path::PathBuf;

use crate::defaults::*;
use crate::schema::{RelayConfig, WhatsAppConfig};

impl RelayConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (useful for testing).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            owner: get("BOT_OWNER"),
            session_dir: get("SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR)),
            settings_file: get("SETTINGS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE)),
            default_ai_enabled: parse_ai_enabled(get("AI_ENABLED").as_deref()),
            welcome_trigger: get("WELCOME_TRIGGER")
                .unwrap_or_else(|| DEFAULT_WELCOME_TRIGGER.to_string()),
            bind_address: get("RELAY_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: get("RELAY_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            log_level: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            whatsapp: WhatsAppConfig {
                verify_token: get("WHATSAPP_VERIFY_TOKEN"),
                access_token: get("WHATSAPP_ACCESS_TOKEN"),
                phone_number_id: get("WHATSAPP_PHONE_NUMBER_ID"),
                graph_url: get("WHATSAPP_GRAPH_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_WHATSAPP_GRAPH_URL.to_string()),
            },
        }
    }
}

/// Only the exact string `true` enables AI; unset falls back to the default.
fn parse_ai_enabled(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => value == "true",
        None => DEFAULT_AI_ENABLED,
    }
}
