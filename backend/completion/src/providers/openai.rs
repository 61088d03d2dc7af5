use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use chatrelay_core::{ChatMessage, CompletionError, LlmProvider, LlmRequest, LlmResponse};
use chatrelay_logging::redact_sensitive_data;

/// OpenAI-compatible chat-completions provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: chatrelay_config::defaults::DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, CompletionError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CompletionError::MissingCredentials);
        };
        let start = Instant::now();

        let body = ChatRequest {
            model: &request.model,
            messages: request.wire_messages(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %request.model, "Sending request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "OpenAI HTTP request failed");
                CompletionError::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = redact_sensitive_data(&response.text().await.unwrap_or_default());
            error!(status = %status, body = %error_body, "OpenAI returned an error status");
            return Err(CompletionError::Status { status: status.as_u16(), body: error_body });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse OpenAI response");
            CompletionError::Malformed(e.to_string())
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(LlmResponse {
            content,
            provider: "openai".to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> LlmRequest {
        LlmRequest {
            model: "gpt-3.5-turbo".into(),
            system_prompt: "You are a helpful assistant.".into(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: 800,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn sends_bearer_and_parses_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 800,
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Hi! How can I help?"}}],
                "usage": {"total_tokens": 21}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(Some("sk-test".into())).with_base_url(server.uri());
        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.content.as_deref(), Some("Hi! How can I help?"));
        assert_eq!(response.tokens_used, 21);
    }

    #[tokio::test]
    async fn missing_key_never_calls_the_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(None).with_base_url(server.uri());
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingCredentials));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(Some("sk-bad".into())).with_base_url(server.uri());
        match provider.complete(&request()).await.unwrap_err() {
            CompletionError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(Some("sk-test".into())).with_base_url(server.uri());
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Malformed(_)));
    }

    #[tokio::test]
    async fn null_content_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(Some("sk-test".into())).with_base_url(server.uri());
        let response = provider.complete(&request()).await.unwrap();
        assert!(response.content.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_is_http_error() {
        let provider =
            OpenAiProvider::new(Some("sk-test".into())).with_base_url("http://127.0.0.1:9");
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Http(_)));
    }
}
