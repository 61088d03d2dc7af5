use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when the transport does not supply one.
pub const DEFAULT_DISPLAY_NAME: &str = "user";

/// A chat message delivered by a transport adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Transport-assigned id, or a generated one when the transport has none.
    pub message_id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub display_name: String,
    pub text: String,
    /// Set when the message originated from the relay's own session.
    pub is_from_self: bool,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(
        conversation_id: impl Into<String>,
        sender_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            sender_id: sender_id.into(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            text: text.into(),
            is_from_self: false,
            received_at: Utc::now(),
        }
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = id.into();
        self
    }

    /// Set the sender's display name; blank names keep the default.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.display_name = name;
        }
        self
    }

    pub fn from_self(mut self, is_from_self: bool) -> Self {
        self.is_from_self = is_from_self;
        self
    }

    /// Whether the text begins with the command marker.
    pub fn is_command(&self) -> bool {
        self.text.starts_with('/')
    }
}

/// Text to send back to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    pub conversation_id: String,
    pub text: String,
}

impl OutboundReply {
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of a chat-completion message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_display_name_keeps_default() {
        let msg = InboundMessage::new("123@s.whatsapp.net", "123", "hi").with_display_name("  ");
        assert_eq!(msg.display_name, DEFAULT_DISPLAY_NAME);

        let msg = msg.with_display_name("Layla");
        assert_eq!(msg.display_name, "Layla");
    }

    #[test]
    fn test_command_marker_must_lead() {
        assert!(InboundMessage::new("c", "s", "/help").is_command());
        assert!(!InboundMessage::new("c", "s", " /help").is_command());
        assert!(!InboundMessage::new("c", "s", "see /help").is_command());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }
}
