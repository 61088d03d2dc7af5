//! `chatrelay-config` — process configuration and per-conversation settings.
//!
//! Provides:
//! - Typed process config loaded from the environment
//! - Default values and validation
//! - Config redaction for safe logging/display
//! - `ConfigStore`: conversation settings with a pluggable persistence backend
//! - JSON file backend with atomic replace

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;

pub use io::JsonFileBackend;
pub use redact::{redact, redacted_config};
pub use schema::{RelayConfig, WhatsAppConfig};
pub use settings::ConversationSettings;
pub use store::{ConfigStore, MemoryBackend, SettingsBackend, SettingsMap, StoreError};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::sync::Arc;
use tracing::{error, warn};

/// Build the settings store for a loaded config, backed by its settings file.
pub async fn open_store(config: &RelayConfig) -> ConfigStore {
    let backend = Arc::new(JsonFileBackend::new(&config.settings_file));
    ConfigStore::load(backend, config.default_ai_enabled).await
}

/// Log every warning and error in a validation report.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for err in &report.errors {
        error!(path = %err.path, message = %err.message, "Config error");
    }
}
