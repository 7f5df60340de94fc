//! Block Analyzer
//!
//! Extracts arguments, weaknesses and implicit evidence per block. The
//! output only enriches question generation; it never reaches the
//! consolidated document fields.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::demanda::{BlockAnalysis, DemandBlock};
use crate::domain::drafting::{prompts, DraftingError};
use crate::ports::{complete_structured_as, GenerativeBackend, StructuredRequest};

/// Wire shape of the analyzer's structured backend response.
#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    analisis: Vec<BlockAnalysis>,
}

/// Analyzes parsed demand blocks.
#[derive(Clone)]
pub struct BlockAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
    max_tokens: u32,
}

impl BlockAnalyzer {
    /// Creates an analyzer over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            max_tokens: 4096,
        }
    }

    /// Sets the completion budget for the analysis call.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Produces one analysis record per block.
    ///
    /// Empty input returns an empty list without a backend call; any
    /// failure degrades to an empty list. Records referencing unknown
    /// block ids are discarded at this boundary.
    pub async fn analyze(&self, blocks: &[DemandBlock], full_text: &str) -> Vec<BlockAnalysis> {
        if blocks.is_empty() {
            return Vec::new();
        }

        let request = StructuredRequest::new(
            prompts::ANALYZER_SYSTEM_PROMPT,
            Self::build_context(blocks, full_text),
            prompts::analysis_schema(),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(0.0);

        match complete_structured_as::<AnalysisResponse>(self.backend.as_ref(), request).await {
            Ok(response) => {
                let known: HashSet<_> = blocks.iter().map(|b| &b.id).collect();
                response
                    .analisis
                    .into_iter()
                    .filter(|a| known.contains(&a.bloque_id))
                    .collect()
            }
            Err(err) => {
                let err = DraftingError::AnalysisFailure(err.to_string());
                tracing::warn!(error = %err, "returning no analysis");
                Vec::new()
            }
        }
    }

    fn build_context(blocks: &[DemandBlock], full_text: &str) -> String {
        let mut context = String::from("BLOQUES DE LA DEMANDA:\n");
        for block in blocks {
            context.push_str(&format!(
                "\n[{}] {} (tipo: {:?}, orden: {})\n{}\n",
                block.id, block.titulo, block.tipo, block.orden, block.contenido
            ));
        }
        context.push_str("\nTEXTO COMPLETO DE REFERENCIA:\n");
        context.push_str(full_text);
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockBackend;
    use crate::domain::demanda::BlockKind;
    use serde_json::json;

    fn blocks() -> Vec<DemandBlock> {
        vec![
            DemandBlock::new("bloque_1", "Hechos", "El locatario dejó de pagar", BlockKind::Hechos, 1),
            DemandBlock::new("bloque_2", "Petitorio", "Se haga lugar a la demanda", BlockKind::Petitorio, 2),
        ]
    }

    #[tokio::test]
    async fn test_empty_blocks_skip_backend() {
        let backend = Arc::new(MockBackend::new());
        let analyzer = BlockAnalyzer::new(backend.clone());

        let analyses = analyzer.analyze(&[], "texto").await;

        assert!(analyses.is_empty());
        assert_eq!(backend.structured_calls().len(), 0);
    }

    #[tokio::test]
    async fn test_one_record_per_block() {
        let backend = Arc::new(MockBackend::new().with_structured_response(json!({
            "analisis": [
                {
                    "bloque_id": "bloque_1",
                    "argumentos_clave": ["Falta de pago continuada"],
                    "puntos_debiles": ["No acompaña recibos"],
                    "prueba_implicita": ["Contrato de locación"],
                    "sugerencias_defensa": ["Acreditar pagos parciales"]
                },
                {"bloque_id": "bloque_2"}
            ]
        })));
        let analyzer = BlockAnalyzer::new(backend);

        let analyses = analyzer.analyze(&blocks(), "texto completo").await;

        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].argumentos_clave.len(), 1);
        assert!(analyses[1].puntos_debiles.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_block_ids_discarded() {
        let backend = Arc::new(MockBackend::new().with_structured_response(json!({
            "analisis": [
                {"bloque_id": "bloque_1"},
                {"bloque_id": "bloque_99"}
            ]
        })));
        let analyzer = BlockAnalyzer::new(backend);

        let analyses = analyzer.analyze(&blocks(), "texto").await;

        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].bloque_id.as_str(), "bloque_1");
    }

    #[tokio::test]
    async fn test_backend_error_degrades_to_empty() {
        let backend = Arc::new(MockBackend::new().with_unavailable("down"));
        let analyzer = BlockAnalyzer::new(backend);

        let analyses = analyzer.analyze(&blocks(), "texto").await;

        assert!(analyses.is_empty());
    }
}
