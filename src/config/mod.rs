//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONTESTIA_` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use contestia::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod drafting;
mod error;

pub use ai::AiConfig;
pub use drafting::{DraftingConfig, PolicyKind};
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Generative backend configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Drafting flow configuration
    #[serde(default)]
    pub drafting: DraftingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads environment variables with the
    /// `CONTESTIA` prefix; `__` separates nested values.
    ///
    /// # Environment Variable Format
    ///
    /// - `CONTESTIA__AI__ANTHROPIC_API_KEY=sk-ant-...` -> `ai.anthropic_api_key`
    /// - `CONTESTIA__DRAFTING__DECISION_POLICY=adaptive` -> `drafting.decision_policy`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONTESTIA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.drafting.validate()?;
        Ok(())
    }
}
