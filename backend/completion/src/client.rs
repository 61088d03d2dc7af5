//! Completion client: fixed model parameters around a pluggable provider.

use std::sync::Arc;

use tracing::{debug, warn};

use chatrelay_config::RelayConfig;
use chatrelay_core::{ChatMessage, CompletionError, LlmProvider, LlmRequest};

use crate::providers::openai::OpenAiProvider;

/// System prompt used when the caller passes an empty one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const MISSING_CREDENTIALS_TEXT: &str = "Error: the OpenAI API key is not configured.";
const EMPTY_REPLY_TEXT: &str = "I couldn't generate a reply right now.";
const SERVICE_ERROR_TEXT: &str = "An error occurred while contacting the AI service.";

/// User-visible text that stands in for a failed completion.
pub fn fallback_text(err: &CompletionError) -> &'static str {
    match err {
        CompletionError::MissingCredentials => MISSING_CREDENTIALS_TEXT,
        CompletionError::EmptyReply => EMPTY_REPLY_TEXT,
        CompletionError::Http(_)
        | CompletionError::Status { .. }
        | CompletionError::Malformed(_) => SERVICE_ERROR_TEXT,
    }
}

/// Turns a system prompt and message list into one reply string.
///
/// Model, token cap, and temperature are process-wide; callers only supply
/// the conversation content.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Client backed by the OpenAI-compatible provider described by `config`.
    pub fn from_config(config: &RelayConfig) -> Self {
        let provider = OpenAiProvider::new(config.openai_api_key.clone())
            .with_base_url(config.openai_base_url.clone());
        Self::new(Arc::new(provider), config.openai_model.clone(), config.max_tokens, config.temperature)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Request one completion. Empty or whitespace-only content is `EmptyReply`.
    pub async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let system_prompt = if system_prompt.trim().is_empty() {
            DEFAULT_SYSTEM_PROMPT
        } else {
            system_prompt
        };

        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: system_prompt.to_string(),
            messages: messages.to_vec(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.provider.complete(&request).await.map_err(|e| {
            warn!(provider = %self.provider.name(), error = %e, "Completion failed");
            e
        })?;

        debug!(
            provider = %response.provider,
            model = %response.model,
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "Completion received"
        );

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CompletionError::EmptyReply),
        }
    }
}
