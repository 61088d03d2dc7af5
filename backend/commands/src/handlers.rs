/// Built-in command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler`. Handlers
/// that change settings go through `ConfigStore::set`; a failed persist is
/// logged and the in-memory change still stands.
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use chatrelay_config::{ConfigStore, ConversationSettings};

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

pub const WELCOME_SET_TEXT: &str = "Welcome message set.";
pub const WELCOME_CLEARED_TEXT: &str = "Welcome message cleared.";

/// Confirmation naming the conversation's AI state.
pub fn ai_state_text(enabled: bool) -> String {
    format!("AI for this chat: {}", if enabled { "enabled" } else { "disabled" })
}

async fn update<F>(store: &ConfigStore, conversation_id: &str, mutator: F) -> ConversationSettings
where
    F: FnOnce(&mut ConversationSettings),
{
    match store.set(conversation_id, mutator).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!(conversation = %conversation_id, error = %e, "[Commands] Settings not persisted");
            store.get(conversation_id).await
        }
    }
}

// ---------------------------------------------------------------------------
// /help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    text: String,
}

impl HelpHandler {
    pub fn from_registry(registry: &CommandRegistry) -> Self {
        let mut lines = vec!["Available commands:".to_string()];
        for cmd in registry.all() {
            for usage in &cmd.usage {
                lines.push(format!("{} - {}", usage, cmd.description));
            }
        }
        Self { text: lines.join("\n") }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        Ok(CommandResponse::ok(self.text.clone()))
    }
}

// ---------------------------------------------------------------------------
// /ai on | off
// ---------------------------------------------------------------------------

pub struct AiHandler {
    pub store: Arc<ConfigStore>,
}

#[async_trait]
impl CommandHandler for AiHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let requested = match inv.raw_args.as_str() {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        };

        let settings = match requested {
            Some(enabled) => {
                info!("[Commands] Setting AI {} for {}", enabled, ctx.conversation_id);
                update(&self.store, &ctx.conversation_id, |s| s.ai_enabled = enabled).await
            }
            None => self.store.get(&ctx.conversation_id).await,
        };

        Ok(CommandResponse::ok(ai_state_text(settings.ai_enabled)))
    }
}

// ---------------------------------------------------------------------------
// /setwelcome <text>
// ---------------------------------------------------------------------------

pub struct SetWelcomeHandler {
    pub store: Arc<ConfigStore>,
}

#[async_trait]
impl CommandHandler for SetWelcomeHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let welcome = inv.raw_args.clone();
        update(&self.store, &ctx.conversation_id, |s| s.welcome_text = welcome).await;
        Ok(CommandResponse::ok(WELCOME_SET_TEXT))
    }
}

// ---------------------------------------------------------------------------
// /clearwelcome
// ---------------------------------------------------------------------------

pub struct ClearWelcomeHandler {
    pub store: Arc<ConfigStore>,
}

#[async_trait]
impl CommandHandler for ClearWelcomeHandler {
    async fn handle(&self, ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        update(&self.store, &ctx.conversation_id, |s| s.welcome_text.clear()).await;
        Ok(CommandResponse::ok(WELCOME_CLEARED_TEXT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OWNER_ONLY_TEXT;
    use crate::build_default_dispatcher;
    use crate::dispatch::CommandDispatcher;
    use chatrelay_config::MemoryBackend;

    const OWNER: &str = "966500000000";
    const CHAT: &str = "966500000000@s.whatsapp.net";

    async fn setup() -> (Arc<MemoryBackend>, Arc<ConfigStore>, CommandDispatcher) {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(ConfigStore::load(backend.clone(), true).await);
        let dispatcher = build_default_dispatcher(store.clone(), Some(format!("+{OWNER}")));
        (backend, store, dispatcher)
    }

    fn ctx(sender: &str) -> CommandContext {
        CommandContext { conversation_id: CHAT.into(), sender_id: sender.into() }
    }

    async fn run(d: &CommandDispatcher, sender: &str, text: &str) -> Option<String> {
        d.dispatch_text(&ctx(sender), text).await.unwrap().map(|r| r.text)
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let (_, _, d) = setup().await;
        let text = run(&d, "stranger", "/help").await.unwrap();
        for usage in ["/help", "/ai on", "/ai off", "/setwelcome <text>", "/clearwelcome"] {
            assert!(text.contains(usage), "missing {usage} in {text}");
        }
    }

    #[tokio::test]
    async fn ai_on_then_off_persists_each_step() {
        let (backend, store, d) = setup().await;

        assert_eq!(run(&d, OWNER, "/ai on").await.unwrap(), ai_state_text(true));
        assert_eq!(backend.snapshots().last().unwrap(), &store.snapshot().await);

        assert_eq!(run(&d, OWNER, "/ai off").await.unwrap(), "AI for this chat: disabled");
        assert_eq!(backend.snapshots().last().unwrap(), &store.snapshot().await);

        assert!(!store.get(CHAT).await.ai_enabled);
        assert_eq!(backend.save_count(), 2);
    }

    #[tokio::test]
    async fn ai_with_other_argument_reports_state_without_saving() {
        let (backend, _, d) = setup().await;
        assert_eq!(run(&d, OWNER, "/ai maybe").await.unwrap(), ai_state_text(true));
        assert_eq!(run(&d, OWNER, "/ai").await.unwrap(), ai_state_text(true));
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn non_owner_never_mutates() {
        let (backend, store, d) = setup().await;
        for text in ["/ai off", "/ai on", "/setwelcome pwned", "/setwelcome", "/clearwelcome"] {
            assert_eq!(run(&d, "15559999999", text).await.unwrap(), OWNER_ONLY_TEXT);
        }
        assert_eq!(backend.save_count(), 0);
        let settings = store.get(CHAT).await;
        assert!(settings.ai_enabled);
        assert_eq!(settings.welcome_text, "");
    }

    #[tokio::test]
    async fn setwelcome_accepts_empty_text() {
        let (_, store, d) = setup().await;
        assert_eq!(run(&d, OWNER, "/setwelcome hi there").await.unwrap(), WELCOME_SET_TEXT);
        assert_eq!(store.get(CHAT).await.welcome_text, "hi there");

        assert_eq!(run(&d, OWNER, "/setwelcome").await.unwrap(), WELCOME_SET_TEXT);
        assert_eq!(store.get(CHAT).await.welcome_text, "");
    }

    #[tokio::test]
    async fn clearwelcome_is_idempotent() {
        let (_, store, d) = setup().await;
        run(&d, OWNER, "/setwelcome hello").await;

        let first = run(&d, OWNER, "/clearwelcome").await.unwrap();
        assert_eq!(store.get(CHAT).await.welcome_text, "");
        let second = run(&d, OWNER, "/clearwelcome").await.unwrap();
        assert_eq!(store.get(CHAT).await.welcome_text, "");
        assert_eq!(first, second);
        assert_eq!(first, WELCOME_CLEARED_TEXT);
    }

    #[tokio::test]
    async fn persist_failure_still_confirms_and_keeps_memory() {
        let (backend, store, d) = setup().await;
        backend.set_fail_saves(true);
        assert_eq!(run(&d, OWNER, "/ai off").await.unwrap(), ai_state_text(false));
        assert!(!store.get(CHAT).await.ai_enabled);
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn unknown_command_gets_no_reply() {
        let (backend, _, d) = setup().await;
        assert!(run(&d, OWNER, "/weather").await.is_none());
        assert_eq!(backend.save_count(), 0);
    }
}
