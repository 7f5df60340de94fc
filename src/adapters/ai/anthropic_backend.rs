//! Anthropic Backend - GenerativeBackend implementation over the Messages API.
//!
//! Structured completions are forced through a single tool (`emitir_resultado`)
//! whose `input_schema` is the request schema, so the model's output is the
//! tool input object itself. Text completions use plain text content blocks.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514");
//!
//! let backend = AnthropicBackend::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AiConfig;
use crate::ports::{
    BackendError, GenerativeBackend, ProviderInfo, StructuredRequest, TextRequest,
};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Name of the tool used to force schema-conforming output.
const RESULT_TOOL_NAME: &str = "emitir_resultado";

/// Configuration for the Anthropic backend.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl From<&AiConfig> for AnthropicConfig {
    fn from(config: &AiConfig) -> Self {
        Self::new(config.anthropic_api_key.clone().unwrap_or_default())
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout())
            .with_max_retries(config.max_retries)
    }
}

/// Anthropic Messages API backend.
pub struct AnthropicBackend {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicBackend {
    /// Creates a new backend with the given configuration.
    pub fn new(config: AnthropicConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the messages endpoint URL.
    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_structured_request(&self, request: &StructuredRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.user_prompt.clone(),
            }],
            system: Some(request.system_prompt.clone()),
            max_tokens: request.max_tokens.unwrap_or(4096),
            temperature: request.temperature,
            tools: Some(vec![AnthropicTool {
                name: RESULT_TOOL_NAME.to_string(),
                description: "Emite el resultado con la estructura requerida.".to_string(),
                input_schema: request.schema.clone(),
            }]),
            tool_choice: Some(AnthropicToolChoice {
                choice_type: "tool".to_string(),
                name: RESULT_TOOL_NAME.to_string(),
            }),
        }
    }

    fn to_text_request(&self, request: &TextRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.user_prompt.clone(),
            }],
            system: Some(request.system_prompt.clone()),
            max_tokens: request.max_tokens.unwrap_or(4096),
            temperature: request.temperature,
            tools: None,
            tool_choice: None,
        }
    }

    async fn send(&self, body: &AnthropicRequest) -> Result<Response, BackendError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    BackendError::network(format!("Connection failed: {}", e))
                } else {
                    BackendError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, BackendError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(BackendError::AuthenticationFailed),
            429 => {
                let retry_after = Self::parse_retry_after(&error_body);
                Err(BackendError::rate_limited(retry_after))
            }
            400 => {
                if error_body.contains("prompt is too long") || error_body.contains("max_tokens") {
                    Err(BackendError::context_too_long(0, 0))
                } else {
                    Err(BackendError::InvalidRequest(error_body))
                }
            }
            500..=599 => Err(BackendError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(BackendError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from error response.
    fn parse_retry_after(error_body: &str) -> u32 {
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
            if let Some(msg) = parsed.get("error").and_then(|e| e.get("message")) {
                if let Some(s) = msg.as_str() {
                    if let Some(idx) = s.find("try again in ") {
                        let rest = &s[idx + 13..];
                        if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                            if let Ok(secs) = rest[..num_end].parse::<u32>() {
                                return secs;
                            }
                        }
                    }
                }
            }
        }
        60
    }

    async fn parse_body(&self, response: Response) -> Result<AnthropicResponse, BackendError> {
        let response = self.handle_response_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::parse(format!("Failed to parse response: {}", e)))
    }

    async fn attempt_structured(
        &self,
        body: &AnthropicRequest,
    ) -> Result<serde_json::Value, BackendError> {
        let response = self.send(body).await?;
        let parsed = self.parse_body(response).await?;

        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::ToolUse { name, input } if name == RESULT_TOOL_NAME => Some(input),
                _ => None,
            })
            .ok_or_else(|| BackendError::parse("response carried no tool_use block"))
    }

    async fn attempt_text(&self, body: &AnthropicRequest) -> Result<String, BackendError> {
        let response = self.send(body).await?;
        let parsed = self.parse_body(response).await?;

        let text = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            Err(BackendError::parse("response carried no text content"))
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl GenerativeBackend for AnthropicBackend {
    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<serde_json::Value, BackendError> {
        let body = self.to_structured_request(&request);
        let mut last_error = BackendError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.attempt_structured(&body).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    async fn complete_text(&self, request: TextRequest) -> Result<String, BackendError> {
        let body = self.to_text_request(&request);
        let mut last_error = BackendError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.attempt_text(&body).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        // All current Claude models expose a 200k context window.
        ProviderInfo::new("anthropic", &self.config.model, 200_000)
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<AnthropicToolChoice>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct AnthropicTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct AnthropicToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_builder_works() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-haiku-20240307")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(5);

        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn test_config_from_ai_config() {
        let ai = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            model: "claude-3-haiku-20240307".to_string(),
            base_url: "https://proxy.internal".to_string(),
            timeout_secs: 30,
            max_retries: 1,
        };

        let config = AnthropicConfig::from(&ai);

        assert_eq!(config.api_key(), "sk-ant-xxx");
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.base_url, "https://proxy.internal");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_structured_request_forces_result_tool() {
        let backend = AnthropicBackend::new(AnthropicConfig::new("test"));
        let request = StructuredRequest::new(
            "system",
            "user",
            json!({"type": "object", "properties": {"x": {"type": "string"}}}),
        )
        .with_max_tokens(1024);

        let body = backend.to_structured_request(&request);

        let tools = body.tools.unwrap();
        assert_eq!(tools[0].name, RESULT_TOOL_NAME);
        assert_eq!(tools[0].input_schema["properties"]["x"]["type"], "string");
        assert_eq!(body.tool_choice.unwrap().name, RESULT_TOOL_NAME);
        assert_eq!(body.max_tokens, 1024);
    }

    #[test]
    fn test_text_request_has_no_tools() {
        let backend = AnthropicBackend::new(AnthropicConfig::new("test"));
        let request = TextRequest::new("system", "user");

        let body = backend.to_text_request(&request);

        assert!(body.tools.is_none());
        assert!(body.tool_choice.is_none());
        assert_eq!(body.max_tokens, 4096);
    }

    #[test]
    fn test_content_block_deserializes_tool_use() {
        let raw = json!([
            {"type": "text", "text": "thinking..."},
            {"type": "tool_use", "id": "tu_1", "name": "emitir_resultado", "input": {"variante": "desalojo"}}
        ]);

        let blocks: Vec<ContentBlock> = serde_json::from_value(raw).unwrap();

        assert!(matches!(
            &blocks[1],
            ContentBlock::ToolUse { name, input }
                if name == "emitir_resultado" && input["variante"] == "desalojo"
        ));
    }

    #[test]
    fn test_parse_retry_after_reads_message_hint() {
        let error = r#"{"error":{"message":"Rate limit exceeded, try again in 12s"}}"#;
        assert_eq!(AnthropicBackend::parse_retry_after(error), 12);
    }

    #[test]
    fn test_parse_retry_after_default() {
        let error = r#"{"error":{"message":"Rate limit exceeded"}}"#;
        assert_eq!(AnthropicBackend::parse_retry_after(error), 60);
    }

    #[test]
    fn test_provider_info() {
        let backend =
            AnthropicBackend::new(AnthropicConfig::new("test").with_model("claude-sonnet-4-20250514"));

        let info = backend.provider_info();
        assert_eq!(info.name, "anthropic");
        assert_eq!(info.model, "claude-sonnet-4-20250514");
        assert_eq!(info.max_context_tokens, 200_000);
    }
}
