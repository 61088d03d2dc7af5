//! Relay Event Logger
//!
//! Structured per-conversation events (inbound, reply, rejection, error)
//! emitted through `tracing` under the `relay_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    Inbound {
        display_name: String,
        text: String,
    },
    Reply {
        /// Which path produced the reply: "command", "welcome", "ai", "default".
        source: String,
        text: String,
    },
    CommandRejected {
        command: String,
        sender_id: String,
    },
    Error {
        error_msg: String,
    },
}

impl RelayEvent {
    /// Replace every free-text field with its redacted form.
    fn redact(&mut self) {
        match self {
            RelayEvent::Inbound { text, .. } | RelayEvent::Reply { text, .. } => {
                *text = redact_sensitive_data(text);
            }
            RelayEvent::CommandRejected { sender_id, .. } => {
                *sender_id = redact_sensitive_data(sender_id);
            }
            RelayEvent::Error { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: RelayEvent,
}

impl EventLogEntry {
    pub fn new(conversation_id: &str, mut event: RelayEvent) -> Self {
        event.redact();
        Self {
            conversation_id: redact_sensitive_data(conversation_id),
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Log a relay event with sensitive content scrubbed.
    pub fn log_event(conversation_id: &str, event: RelayEvent) {
        let entry = EventLogEntry::new(conversation_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        match entry.event {
            RelayEvent::Error { .. } | RelayEvent::CommandRejected { .. } => {
                warn!(target: "relay_events", event = %json, "Relay event");
            }
            _ => info!(target: "relay_events", event = %json, "Relay event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_redacts_text_and_conversation() {
        let entry = EventLogEntry::new(
            "+15551234567@s.whatsapp.net",
            RelayEvent::Inbound {
                display_name: "Omar".into(),
                text: "call me at +1-555-987-6543".into(),
            },
        );
        assert!(!entry.conversation_id.contains("5551234567"));
        match entry.event {
            RelayEvent::Inbound { display_name, text } => {
                assert_eq!(display_name, "Omar");
                assert!(text.contains("[REDACTED_PHONE]"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let entry = EventLogEntry::new(
            "chat",
            RelayEvent::Reply { source: "welcome".into(), text: "hi there".into() },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "reply");
        assert_eq!(json["event"]["source"], "welcome");
        assert_eq!(json["conversation_id"], "chat");
    }
}
