//! Generative backend adapters.

mod anthropic_backend;
mod mock_backend;

pub use anthropic_backend::{AnthropicBackend, AnthropicConfig};
pub use mock_backend::MockBackend;
