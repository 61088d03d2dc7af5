pub mod client;
pub mod providers;

pub use client::{fallback_text, CompletionClient, DEFAULT_SYSTEM_PROMPT};
pub use providers::mock::MockProvider;
pub use providers::openai::OpenAiProvider;
