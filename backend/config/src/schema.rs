//! Relay runtime configuration schema.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::*;

/// Root process configuration for the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Completion-service credential. `None` degrades AI replies to an error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    pub openai_model: String,

    pub openai_base_url: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Operator allowed to run admin commands. `None` rejects every admin command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    pub session_dir: PathBuf,

    pub settings_file: PathBuf,

    pub default_ai_enabled: bool,

    pub welcome_trigger: String,

    pub bind_address: String,

    pub port: u16,

    pub log_level: String,

    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            owner: None,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            default_ai_enabled: DEFAULT_AI_ENABLED,
            welcome_trigger: DEFAULT_WELCOME_TRIGGER.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            whatsapp: WhatsAppConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Directory the rolling log files are written to.
    pub fn log_dir(&self) -> PathBuf {
        self.session_dir.join(LOG_SUBDIR)
    }

    /// `bind:port` for the webhook listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// WhatsApp Cloud API credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<String>,

    pub graph_url: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            verify_token: None,
            access_token: None,
            phone_number_id: None,
            graph_url: DEFAULT_WHATSAPP_GRAPH_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_under_session_dir() {
        let cfg = RelayConfig {
            session_dir: PathBuf::from("/var/lib/relay"),
            ..Default::default()
        };
        assert_eq!(cfg.log_dir(), PathBuf::from("/var/lib/relay/logs"));
    }

    #[test]
    fn test_unset_secrets_are_not_serialized() {
        let json = serde_json::to_value(RelayConfig::default()).unwrap();
        assert!(json.get("openaiApiKey").is_none());
        assert!(json.get("owner").is_none());
        assert_eq!(json["openaiModel"], DEFAULT_MODEL);
        assert_eq!(json["maxTokens"], 800);
    }
}
