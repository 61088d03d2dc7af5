//! Default values for every process-level option.

/// Completion model used when `OPENAI_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Chat-completions base URL; `/chat/completions` is appended.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Response-length cap sent with every completion request.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Sampling temperature sent with every completion request.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Whether AI replies are on for conversations with no stored settings.
pub const DEFAULT_AI_ENABLED: bool = true;

/// Transport session/storage directory.
pub const DEFAULT_SESSION_DIR: &str = "./auth_info";

/// Per-conversation settings file.
pub const DEFAULT_SETTINGS_FILE: &str = "./chat_settings.json";

/// Phrase that triggers the welcome text ("hello").
pub const DEFAULT_WELCOME_TRIGGER: &str = "مرحبا";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Graph API base used by the WhatsApp Cloud sender.
pub const DEFAULT_WHATSAPP_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

/// Log files live in this subdirectory of the session directory.
pub const LOG_SUBDIR: &str = "logs";
