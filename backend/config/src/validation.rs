//! Config validation: startup checks with user-friendly messages.

use crate::schema::RelayConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_completion(config, &mut report);
    validate_owner(config, &mut report);
    validate_listener(config, &mut report);
    validate_whatsapp(config, &mut report);
    report
}

fn validate_completion(config: &RelayConfig, report: &mut ValidationReport) {
    if config.openai_api_key.is_none() {
        report.warn("openaiApiKey", "OPENAI_API_KEY is not set; AI replies will be an error message");
    }
    if config.openai_model.trim().is_empty() {
        report.error("openaiModel", "Model id cannot be empty");
    }
    if !(0.0..=2.0).contains(&config.temperature) {
        report.error("temperature", "Temperature must be between 0 and 2");
    }
    if config.max_tokens == 0 {
        report.error("maxTokens", "maxTokens must be greater than 0");
    }
}

fn validate_owner(config: &RelayConfig, report: &mut ValidationReport) {
    match config.owner.as_deref() {
        None => report.warn("owner", "BOT_OWNER is not set; every admin command will be rejected"),
        Some(owner) => {
            let digits = owner.trim().trim_start_matches('+');
            if !digits.chars().all(|c| c.is_ascii_digit()) {
                report.warn("owner", "BOT_OWNER should be a phone number with an optional leading '+'");
            }
        }
    }
}

fn validate_listener(config: &RelayConfig, report: &mut ValidationReport) {
    if config.port == 0 {
        report.error("port", "Port must be greater than 0");
    }
    if config.welcome_trigger.trim().is_empty() {
        report.error("welcomeTrigger", "Welcome trigger cannot be empty");
    }
}

fn validate_whatsapp(config: &RelayConfig, report: &mut ValidationReport) {
    let wa = &config.whatsapp;
    if wa.verify_token.is_none() {
        report.warn("whatsapp.verifyToken", "WHATSAPP_VERIFY_TOKEN is not set; webhook verification will fail");
    }
    if wa.access_token.is_none() || wa.phone_number_id.is_none() {
        report.warn(
            "whatsapp",
            "WHATSAPP_ACCESS_TOKEN and WHATSAPP_PHONE_NUMBER_ID are required to send replies",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WhatsAppConfig;

    fn complete_config() -> RelayConfig {
        RelayConfig {
            openai_api_key: Some("sk-test".into()),
            owner: Some("+15550001111".into()),
            whatsapp: WhatsAppConfig {
                verify_token: Some("verify".into()),
                access_token: Some("token".into()),
                phone_number_id: Some("1234".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn complete_config_is_clean() {
        let report = validate(&complete_config());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn default_config_warns_but_is_valid() {
        let report = validate(&RelayConfig::default());
        assert!(report.is_valid());
        let paths: Vec<_> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"openaiApiKey"));
        assert!(paths.contains(&"owner"));
        assert!(paths.contains(&"whatsapp"));
    }

    #[test]
    fn zero_port_and_empty_model_are_errors() {
        let cfg = RelayConfig {
            port: 0,
            openai_model: " ".into(),
            ..complete_config()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn non_numeric_owner_warns() {
        let cfg = RelayConfig { owner: Some("alice".into()), ..complete_config() };
        let report = validate(&cfg);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "owner");
    }
}
