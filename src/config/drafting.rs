//! Drafting flow configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Drafting flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DraftingConfig {
    /// Which decision policy drives the flow
    #[serde(default)]
    pub decision_policy: PolicyKind,

    /// Document type key used against the variant registry
    #[serde(default = "default_document_type")]
    pub document_type: String,

    /// Completion budget for structured drafting calls
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Decision policy selector
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Pure rule-based policy
    #[default]
    Deterministic,
    /// Backend-driven policy with local heuristic fallback
    Adaptive,
}

impl DraftingConfig {
    /// Validate drafting configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.document_type.is_empty() {
            return Err(ValidationError::MissingRequired("DOCUMENT_TYPE"));
        }
        Ok(())
    }
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            decision_policy: PolicyKind::default(),
            document_type: default_document_type(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_document_type() -> String {
    "contestacion".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}
