use serde::{Deserialize, Serialize};

/// Per-conversation relay settings.
///
/// Stored on disk as `{"aiEnabled": bool, "welcome": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSettings {
    #[serde(rename = "aiEnabled", default)]
    pub ai_enabled: bool,

    /// Sent instead of an AI reply when the welcome trigger appears. Empty means none.
    #[serde(rename = "welcome", default)]
    pub welcome_text: String,
}

impl ConversationSettings {
    pub fn new(ai_enabled: bool) -> Self {
        Self { ai_enabled, welcome_text: String::new() }
    }

    pub fn has_welcome(&self) -> bool {
        !self.welcome_text.is_empty()
    }
}
