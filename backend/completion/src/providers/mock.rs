use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chatrelay_core::{CompletionError, LlmProvider, LlmRequest, LlmResponse};

#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Empty,
    Fail(String),
}

/// A mock LLM provider that returns canned responses and counts calls.
pub struct MockProvider {
    name: String,
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<LlmRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: MockBehavior::Reply("Mock response".to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.behavior = MockBehavior::Reply(response.into());
        self
    }

    /// Answer successfully but without any completion text.
    pub fn with_empty_reply(mut self) -> Self {
        self.behavior = MockBehavior::Empty;
        self
    }

    /// Fail every call as a network error would.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.behavior = MockBehavior::Fail(message.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(req.clone());
        }

        let content = match &self.behavior {
            MockBehavior::Reply(text) => Some(text.clone()),
            MockBehavior::Empty => None,
            MockBehavior::Fail(message) => return Err(CompletionError::Http(message.clone())),
        };

        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model: req.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
