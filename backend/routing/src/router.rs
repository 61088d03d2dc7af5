/// Message router — choose the reply for a non-command message.
///
/// Priority is fixed: welcome text on a trigger match, then an AI completion
/// when enabled, then the "AI is off" notice. Every routed message yields
/// exactly one reply.
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use chatrelay_completion::{fallback_text, CompletionClient};
use chatrelay_config::ConfigStore;
use chatrelay_core::ChatMessage;
use chatrelay_logging::{EventLogger, RelayEvent};

pub const DEFAULT_PERSONA: &str =
    "You are a friendly, responsive assistant. Reply in Arabic when the user writes in Arabic.";

pub const AI_DISABLED_TEXT: &str =
    "The bot is ready, but AI is turned off in this chat. Send /help for commands.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Welcome,
    Ai,
    Default,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Welcome => "welcome",
            ReplySource::Ai => "ai",
            ReplySource::Default => "default",
        }
    }
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedReply {
    pub source: ReplySource,
    pub text: String,
}

pub struct MessageRouter {
    store: Arc<ConfigStore>,
    completion: CompletionClient,
    /// Lowercased once; matching is a case-insensitive substring test.
    welcome_trigger: String,
}

impl MessageRouter {
    pub fn new(store: Arc<ConfigStore>, completion: CompletionClient, welcome_trigger: &str) -> Self {
        Self {
            store,
            completion,
            welcome_trigger: welcome_trigger.trim().to_lowercase(),
        }
    }

    /// An empty trigger never matches.
    pub fn is_welcome_trigger(&self, text: &str) -> bool {
        !self.welcome_trigger.is_empty() && text.to_lowercase().contains(&self.welcome_trigger)
    }

    pub async fn route(&self, conversation_id: &str, text: &str) -> RoutedReply {
        let settings = self.store.get(conversation_id).await;

        if settings.has_welcome() && self.is_welcome_trigger(text) {
            debug!("[Router] {} → welcome", conversation_id);
            return RoutedReply { source: ReplySource::Welcome, text: settings.welcome_text };
        }

        if !settings.ai_enabled {
            debug!("[Router] {} → AI disabled", conversation_id);
            return RoutedReply { source: ReplySource::Default, text: AI_DISABLED_TEXT.to_string() };
        }

        debug!("[Router] {} → completion ({})", conversation_id, self.completion.model());
        let text = match self.completion.complete(DEFAULT_PERSONA, &[ChatMessage::user(text)]).await {
            Ok(reply) => reply,
            Err(e) => {
                EventLogger::log_event(conversation_id, RelayEvent::Error { error_msg: e.to_string() });
                fallback_text(&e).to_string()
            }
        };
        RoutedReply { source: ReplySource::Ai, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_completion::MockProvider;
    use chatrelay_config::{MemoryBackend, RelayConfig};
    use chatrelay_core::Role;

    const CHAT: &str = "966500000000@s.whatsapp.net";
    const TRIGGER: &str = "مرحبا";

    async fn setup(provider: MockProvider, default_ai: bool) -> (Arc<MockProvider>, Arc<MemoryBackend>, Arc<ConfigStore>, MessageRouter) {
        let provider = Arc::new(provider);
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(ConfigStore::load(backend.clone(), default_ai).await);
        let completion = CompletionClient::new(provider.clone(), "gpt-3.5-turbo", 800, 0.7);
        let router = MessageRouter::new(store.clone(), completion, TRIGGER);
        (provider, backend, store, router)
    }

    #[tokio::test]
    async fn welcome_wins_over_ai_without_calling_completion() {
        let (provider, _, store, router) = setup(MockProvider::new("mock").with_response("ai"), true).await;
        store.set(CHAT, |s| s.welcome_text = "hi there".into()).await.unwrap();

        let reply = router.route(CHAT, "مرحبا يا بوت").await;
        assert_eq!(reply, RoutedReply { source: ReplySource::Welcome, text: "hi there".into() });
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn trigger_match_is_case_insensitive() {
        let (_, _, store, _) = setup(MockProvider::new("mock"), false).await;
        let completion = CompletionClient::new(Arc::new(MockProvider::new("mock")), "m", 10, 0.0);
        let router = MessageRouter::new(store.clone(), completion, "Hello");
        store.set(CHAT, |s| s.welcome_text = "welcome!".into()).await.unwrap();

        assert_eq!(router.route(CHAT, "oh HELLO friend").await.source, ReplySource::Welcome);
        assert_eq!(router.route(CHAT, "goodbye").await.source, ReplySource::Default);
    }

    #[tokio::test]
    async fn trigger_without_welcome_text_falls_through() {
        let (provider, _, _, router) = setup(MockProvider::new("mock").with_response("أهلا"), true).await;
        let reply = router.route(CHAT, TRIGGER).await;
        assert_eq!(reply.source, ReplySource::Ai);
        assert_eq!(reply.text, "أهلا");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn ai_request_carries_persona_and_single_user_message() {
        let (provider, _, _, router) = setup(MockProvider::new("mock").with_response("ok"), true).await;
        router.route(CHAT, "what time is it?").await;

        let req = provider.last_request().unwrap();
        assert_eq!(req.system_prompt, DEFAULT_PERSONA);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
        assert_eq!(req.messages[0].content, "what time is it?");
    }

    #[tokio::test]
    async fn failing_provider_yields_fallback_text() {
        let (_, _, _, router) = setup(MockProvider::new("mock").failing("timeout"), true).await;
        let reply = router.route(CHAT, "hello").await;
        assert_eq!(reply.source, ReplySource::Ai);
        assert_eq!(reply.text, "An error occurred while contacting the AI service.");

        let (_, _, _, router) = setup(MockProvider::new("mock").with_empty_reply(), true).await;
        assert_eq!(router.route(CHAT, "hello").await.text, "I couldn't generate a reply right now.");
    }

    #[tokio::test]
    async fn missing_credentials_reply_without_network() {
        let store = Arc::new(ConfigStore::load(Arc::new(MemoryBackend::new()), true).await);
        let router = MessageRouter::new(store, CompletionClient::from_config(&RelayConfig::default()), TRIGGER);
        let reply = router.route(CHAT, "hello").await;
        assert_eq!(reply.text, "Error: the OpenAI API key is not configured.");
    }

    #[tokio::test]
    async fn ai_disabled_sends_notice_and_leaves_store_unpersisted() {
        let (provider, backend, store, router) = setup(MockProvider::new("mock"), false).await;
        let reply = router.route(CHAT, "hello").await;

        assert_eq!(reply, RoutedReply { source: ReplySource::Default, text: AI_DISABLED_TEXT.into() });
        assert_eq!(provider.calls(), 0);
        assert_eq!(backend.save_count(), 0);
        assert!(!store.get(CHAT).await.ai_enabled);
    }
}
