//! Demand Parser
//!
//! Turns raw demand text into an ordered list of typed blocks via one
//! structured backend call. Never fails: empty input short-circuits, and
//! any backend failure or empty result degrades to a single fallback block
//! covering the whole text.

use serde::Deserialize;
use std::sync::Arc;

use crate::domain::demanda::DemandBlock;
use crate::domain::drafting::{prompts, DraftingError};
use crate::ports::{complete_structured_as, GenerativeBackend, StructuredRequest};

/// Parser output: blocks plus detected demand metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDemand {
    pub bloques: Vec<DemandBlock>,
    pub categoria_detectada: Option<String>,
    pub pretensiones_principales: Vec<String>,
}

/// Wire shape of the parser's structured backend response.
#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    bloques: Vec<DemandBlock>,
    #[serde(default)]
    categoria_detectada: Option<String>,
    #[serde(default)]
    pretensiones_principales: Vec<String>,
}

/// Parses raw demand text into addressable blocks.
#[derive(Clone)]
pub struct DemandParser {
    backend: Arc<dyn GenerativeBackend>,
    max_tokens: u32,
}

impl DemandParser {
    /// Creates a parser over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            max_tokens: 4096,
        }
    }

    /// Sets the completion budget for the parse call.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Parses the demand text.
    ///
    /// Empty or whitespace-only input returns zero blocks without touching
    /// the backend. For non-empty input the result always carries at least
    /// one block.
    pub async fn parse(&self, raw_text: &str) -> ParsedDemand {
        if raw_text.trim().is_empty() {
            return ParsedDemand::default();
        }

        let request = StructuredRequest::new(
            prompts::PARSER_SYSTEM_PROMPT,
            raw_text.to_string(),
            prompts::parse_schema(),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(0.0);

        match complete_structured_as::<ParseResponse>(self.backend.as_ref(), request).await {
            Ok(response) if !response.bloques.is_empty() => ParsedDemand {
                bloques: response.bloques,
                categoria_detectada: response.categoria_detectada,
                pretensiones_principales: response.pretensiones_principales,
            },
            Ok(_) => {
                let err = DraftingError::ParseFailure("zero blocks returned".to_string());
                tracing::warn!(error = %err, "using fallback block");
                ParsedDemand {
                    bloques: vec![DemandBlock::fallback(raw_text)],
                    categoria_detectada: None,
                    pretensiones_principales: Vec::new(),
                }
            }
            Err(err) => {
                let err = DraftingError::ParseFailure(err.to_string());
                tracing::warn!(error = %err, "using fallback block");
                ParsedDemand {
                    bloques: vec![DemandBlock::fallback(raw_text)],
                    categoria_detectada: None,
                    pretensiones_principales: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockBackend;
    use crate::domain::demanda::BlockKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_input_skips_backend() {
        let backend = Arc::new(MockBackend::new());
        let parser = DemandParser::new(backend.clone());

        let parsed = parser.parse("   \n  ").await;

        assert!(parsed.bloques.is_empty());
        assert_eq!(backend.structured_calls().len(), 0);
    }

    #[tokio::test]
    async fn test_parses_backend_blocks() {
        let backend = Arc::new(MockBackend::new().with_structured_response(json!({
            "bloques": [
                {"id": "bloque_1", "titulo": "Objeto", "contenido": "Demanda por...", "tipo": "objeto", "orden": 1},
                {"id": "bloque_2", "titulo": "Hechos", "contenido": "El día...", "tipo": "hechos", "orden": 2}
            ],
            "categoria_detectada": "incumplimiento_locacion",
            "pretensiones_principales": ["Cobro de alquileres adeudados"]
        })));
        let parser = DemandParser::new(backend);

        let parsed = parser.parse("Texto de demanda...").await;

        assert_eq!(parsed.bloques.len(), 2);
        assert_eq!(parsed.bloques[1].tipo, BlockKind::Hechos);
        assert_eq!(
            parsed.categoria_detectada.as_deref(),
            Some("incumplimiento_locacion")
        );
        assert_eq!(parsed.pretensiones_principales.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_blocks_yields_fallback() {
        let backend =
            Arc::new(MockBackend::new().with_structured_response(json!({"bloques": []})));
        let parser = DemandParser::new(backend);

        let parsed = parser.parse("  Texto de demanda  ").await;

        assert_eq!(parsed.bloques.len(), 1);
        let block = &parsed.bloques[0];
        assert_eq!(block.id.as_str(), "bloque_1");
        assert_eq!(block.titulo, "Contenido completo");
        assert_eq!(block.contenido, "Texto de demanda");
        assert_eq!(block.tipo, BlockKind::Otro);
        assert_eq!(block.orden, 1);
    }

    #[tokio::test]
    async fn test_backend_error_yields_fallback() {
        let backend = Arc::new(MockBackend::new().with_unavailable("model down"));
        let parser = DemandParser::new(backend);

        let parsed = parser.parse("Texto de demanda").await;

        assert_eq!(parsed.bloques.len(), 1);
        assert_eq!(parsed.bloques[0].tipo, BlockKind::Otro);
        assert!(parsed.categoria_detectada.is_none());
    }

    #[tokio::test]
    async fn test_backend_receives_verbatim_text_and_schema() {
        let backend = Arc::new(MockBackend::new().with_structured_response(json!({
            "bloques": [
                {"id": "bloque_1", "titulo": "Todo", "contenido": "x", "tipo": "otro", "orden": 1}
            ]
        })));
        let parser = DemandParser::new(backend.clone());

        parser.parse("Texto íntegro de la demanda").await;

        let calls = backend.structured_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_prompt, "Texto íntegro de la demanda");
        assert_eq!(calls[0].schema["required"][0], "bloques");
    }
}
