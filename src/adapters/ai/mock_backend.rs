//! Mock generative backend for tests.
//!
//! Responses are queued up front and consumed in call order; every request
//! is captured so tests can assert on the prompts and schemas actually sent.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{
    BackendError, GenerativeBackend, ProviderInfo, StructuredRequest, TextRequest,
};

enum MockReply {
    Structured(serde_json::Value),
    Text(String),
    Unavailable(String),
}

/// Scripted [`GenerativeBackend`] with call capture.
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<MockReply>>,
    structured_calls: Mutex<Vec<StructuredRequest>>,
    text_calls: Mutex<Vec<TextRequest>>,
}

impl MockBackend {
    /// Creates a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a structured response.
    pub fn with_structured_response(self, value: serde_json::Value) -> Self {
        self.push(MockReply::Structured(value));
        self
    }

    /// Queues a free-text response.
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queues an `Unavailable` failure.
    pub fn with_unavailable(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Unavailable(message.into()));
        self
    }

    /// Returns the structured requests received so far.
    pub fn structured_calls(&self) -> Vec<StructuredRequest> {
        lock_ignoring_poison(&self.structured_calls).clone()
    }

    /// Returns the text requests received so far.
    pub fn text_calls(&self) -> Vec<TextRequest> {
        lock_ignoring_poison(&self.text_calls).clone()
    }

    fn push(&self, reply: MockReply) {
        lock_ignoring_poison(&self.replies).push_back(reply);
    }

    fn pop(&self) -> Option<MockReply> {
        lock_ignoring_poison(&self.replies).pop_front()
    }
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<serde_json::Value, BackendError> {
        lock_ignoring_poison(&self.structured_calls).push(request);
        match self.pop() {
            Some(MockReply::Structured(value)) => Ok(value),
            Some(MockReply::Text(_)) => Err(BackendError::parse(
                "queued text response for a structured call",
            )),
            Some(MockReply::Unavailable(message)) => Err(BackendError::unavailable(message)),
            None => Err(BackendError::unavailable("no queued response")),
        }
    }

    async fn complete_text(&self, request: TextRequest) -> Result<String, BackendError> {
        lock_ignoring_poison(&self.text_calls).push(request);
        match self.pop() {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Structured(_)) => Err(BackendError::parse(
                "queued structured response for a text call",
            )),
            Some(MockReply::Unavailable(message)) => Err(BackendError::unavailable(message)),
            None => Err(BackendError::unavailable("no queued response")),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock-model", 200_000)
    }
}
