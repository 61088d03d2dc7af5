//! Config redaction: produce safe-to-share config snapshots by masking sensitive fields.
//!
//! Masks API keys, access/verify tokens, and phone numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::RelayConfig;

/// Key suffixes (lowercased) whose string values are secrets.
static SENSITIVE_SUFFIXES: &[&str] = &["apikey", "api_key", "token", "secret", "password"];

/// Phone number pattern
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

/// Redact a config JSON value, replacing sensitive strings with a short hint + `***`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

/// Serialize and redact a relay config for display.
pub fn redacted_config(config: &RelayConfig) -> Value {
    serde_json::to_value(config)
        .map(|v| redact(&v))
        .unwrap_or(Value::Null)
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

fn hint(s: &str) -> Value {
    let prefix: String = s.chars().take(4).collect();
    if s.chars().count() > 4 {
        Value::String(format!("{prefix}***"))
    } else {
        Value::String("***".to_string())
    }
}

fn redact_string(s: &str, key: &str) -> Value {
    if s.is_empty() {
        return Value::String(String::new());
    }
    if is_sensitive_key(key) || PHONE_PATTERN.is_match(s) {
        return hint(s);
    }
    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => {
            Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect())
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let cfg = RelayConfig {
            openai_api_key: Some("sk-abcdef123456".into()),
            ..Default::default()
        };
        let redacted = redacted_config(&cfg);
        let key = redacted["openaiApiKey"].as_str().unwrap();
        assert_eq!(key, "sk-a***");
    }

    #[test]
    fn redacts_whatsapp_tokens() {
        let v = json!({ "whatsapp": { "accessToken": "EAAGm0PX4ZCps", "verifyToken": "abc" } });
        let redacted = redact(&v);
        assert_eq!(redacted["whatsapp"]["accessToken"], "EAAG***");
        assert_eq!(redacted["whatsapp"]["verifyToken"], "***");
    }

    #[test]
    fn redacts_owner_phone() {
        let v = json!({ "owner": "+966501234567" });
        let redacted = redact(&v);
        assert_eq!(redacted["owner"], "+966***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let redacted = redacted_config(&RelayConfig::default());
        assert_eq!(redacted["openaiModel"], "gpt-3.5-turbo");
        assert_eq!(redacted["welcomeTrigger"], "مرحبا");
    }
}
