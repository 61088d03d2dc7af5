/// Command dispatch — authorize detected commands and route them to handlers.
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use chatrelay_logging::{EventLogger, RelayEvent};

use crate::auth::{OwnerPolicy, OWNER_ONLY_TEXT};
use crate::detection::detect_command;
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub conversation_id: String,
    pub sender_id: String,
}

/// Text reply produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub text: String,
}

impl CommandResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    owner: OwnerPolicy,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, owner: OwnerPolicy) -> Self {
        Self { registry, handlers: HashMap::new(), owner }
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    /// Detect and run a command from raw message text.
    ///
    /// `Ok(None)` means the text was not a recognized command and nothing
    /// should be sent back.
    pub async fn dispatch_text(&self, ctx: &CommandContext, text: &str) -> Result<Option<CommandResponse>> {
        match detect_command(text, &self.registry) {
            Some(inv) => self.dispatch(ctx, &inv).await,
            None => {
                debug!("[Commands] Ignoring unrecognized command in {}", ctx.conversation_id);
                Ok(None)
            }
        }
    }

    pub async fn dispatch(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<Option<CommandResponse>> {
        let (Some(def), Some(handler)) = (self.registry.find_by_key(&inv.key), self.handlers.get(&inv.key)) else {
            debug!("[Commands] No handler registered for /{}", inv.key);
            return Ok(None);
        };

        if def.owner_only && !self.owner.is_owner(&ctx.sender_id) {
            EventLogger::log_event(
                &ctx.conversation_id,
                RelayEvent::CommandRejected {
                    command: inv.key.clone(),
                    sender_id: ctx.sender_id.clone(),
                },
            );
            return Ok(Some(CommandResponse::ok(OWNER_ONLY_TEXT)));
        }

        info!("[Commands] Dispatching /{} in {}", inv.key, ctx.conversation_id);
        handler.handle(ctx, inv).await.map(Some)
    }
}
