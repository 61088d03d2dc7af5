use anyhow::Result;
use async_trait::async_trait;

use crate::error::CompletionError;
use crate::message::{ChatMessage, OutboundReply};

/// Trait for language-model completion providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the raw response.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, CompletionError>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmRequest {
    /// Full message list as sent on the wire: system prompt first.
    pub fn wire_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(self.messages.iter().cloned());
        messages
    }
}

/// Response from an LLM provider. `content` is `None` when the service
/// answered without a completion field.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: Option<String>,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Outbound half of a messaging transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name for logging.
    fn name(&self) -> &str;

    /// Deliver a reply to its conversation.
    async fn send(&self, reply: &OutboundReply) -> Result<()>;
}
