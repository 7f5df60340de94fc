//! Generative Backend Port - the single seam for structured text generation.
//!
//! Every component that needs synthesis (parser, analyzer, question
//! generator, consolidator, selector, draft rendering) calls this port with
//! a domain system prompt, a user-facing content prompt and, for structured
//! calls, a strict output schema. Implementations connect to external LLM
//! services; tests use the mock adapter.
//!
//! Callers must treat failures as recoverable: component boundaries convert
//! a `BackendError` into a schema-valid degraded result instead of
//! propagating it.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Port for structured and free-text generation.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate an object conforming to `request.schema`.
    ///
    /// The returned value is the raw JSON object; use
    /// [`complete_structured_as`] to deserialize it into a typed result.
    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<serde_json::Value, BackendError>;

    /// Generate a free-text completion.
    async fn complete_text(&self, request: TextRequest) -> Result<String, BackendError>;

    /// Get provider information (name, model, context window).
    fn provider_info(&self) -> ProviderInfo;
}

/// Completes a structured request and deserializes the result.
pub async fn complete_structured_as<T: DeserializeOwned>(
    backend: &dyn GenerativeBackend,
    request: StructuredRequest,
) -> Result<T, BackendError> {
    let value = backend.complete_structured(request).await?;
    serde_json::from_value(value).map_err(|e| BackendError::parse(e.to_string()))
}

/// Request for a schema-constrained completion.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Domain system prompt guiding model behavior.
    pub system_prompt: String,
    /// User-facing content prompt.
    pub user_prompt: String,
    /// JSON schema the output object must conform to.
    pub schema: serde_json::Value,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl StructuredRequest {
    /// Creates a new structured request.
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        schema: serde_json::Value,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            schema,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Request for a free-text completion.
#[derive(Debug, Clone)]
pub struct TextRequest {
    /// Domain system prompt guiding model behavior.
    pub system_prompt: String,
    /// User-facing content prompt.
    pub user_prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl TextRequest {
    /// Creates a new text request.
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Provider information and capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "anthropic").
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// Maximum context window size in tokens.
    pub max_context_tokens: u32,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context_tokens: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens,
        }
    }
}

/// Generative backend errors.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Context (prompts + content) exceeds model limit.
    #[error("context too long: {tokens} tokens exceeds {max} limit")]
    ContextTooLong {
        /// Actual token count.
        tokens: u32,
        /// Maximum allowed.
        max: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response into the requested shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl BackendError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a context too long error.
    pub fn context_too_long(tokens: u32, max: u32) -> Self {
        Self::ContextTooLong { tokens, max }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable by a wrapping caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::RateLimited { .. }
                | BackendError::Unavailable { .. }
                | BackendError::Network(_)
                | BackendError::Timeout { .. }
        )
    }
}
