//! Response Consolidator
//!
//! Merges the per-block responses into the five canonical document fields.
//! Blocks answered `sin_posicion` are excluded from the stance context
//! (they feed neither admitted nor denied facts), but their offered
//! evidence still enters the unified evidence section.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::demanda::{BlockResponse, DemandBlock, FormDataConsolidado};
use crate::domain::drafting::{prompts, DraftingError};
use crate::domain::foundation::BlockId;
use crate::ports::{complete_structured_as, GenerativeBackend, StructuredRequest};

/// Consolidates per-block responses into canonical form fields.
#[derive(Clone)]
pub struct ResponseConsolidator {
    backend: Arc<dyn GenerativeBackend>,
    max_tokens: u32,
}

impl ResponseConsolidator {
    /// Creates a consolidator over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            max_tokens: 4096,
        }
    }

    /// Sets the completion budget for the consolidation call.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Consolidates responses into the five canonical fields.
    ///
    /// An empty response map returns all fields as empty strings without a
    /// backend call; so does any backend failure (degraded-but-valid).
    pub async fn consolidate(
        &self,
        responses: &HashMap<BlockId, BlockResponse>,
        blocks: &[DemandBlock],
    ) -> FormDataConsolidado {
        if responses.is_empty() {
            return FormDataConsolidado::default();
        }

        let request = StructuredRequest::new(
            prompts::CONSOLIDATOR_SYSTEM_PROMPT,
            Self::build_context(responses, blocks),
            prompts::consolidation_schema(),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(0.2);

        match complete_structured_as::<FormDataConsolidado>(self.backend.as_ref(), request).await {
            Ok(data) => data,
            Err(err) => {
                let err = DraftingError::ConsolidationFailure(err.to_string());
                tracing::warn!(error = %err, "returning empty fields");
                FormDataConsolidado::default()
            }
        }
    }

    /// Builds the backend context: stances per block (excluding
    /// `sin_posicion`) followed by the evidence offered across all blocks.
    fn build_context(
        responses: &HashMap<BlockId, BlockResponse>,
        blocks: &[DemandBlock],
    ) -> String {
        let mut ordered: Vec<&DemandBlock> = blocks.iter().collect();
        ordered.sort_by_key(|b| b.orden);

        let mut context = String::from("POSTURAS POR BLOQUE:\n");
        for block in &ordered {
            let Some(response) = responses.get(&block.id) else {
                continue;
            };
            if !response.takes_position() {
                continue;
            }
            context.push_str(&format!(
                "\n[{}] {}: el profesional {} lo alegado.\n",
                block.id,
                block.titulo,
                response.postura.label()
            ));
            if let Some(fundamentacion) = &response.fundamentacion {
                context.push_str(&format!("Fundamentación: {}\n", fundamentacion));
            }
            if let Some(prueba) = &response.prueba_ofrecida {
                if !prueba.is_empty() {
                    context.push_str(&format!("Prueba ofrecida: {}\n", prueba.join("; ")));
                }
            }
        }

        context.push_str("\nPRUEBA OFRECIDA EN TODOS LOS BLOQUES:\n");
        for block in &ordered {
            let Some(response) = responses.get(&block.id) else {
                continue;
            };
            if let Some(prueba) = &response.prueba_ofrecida {
                for item in prueba {
                    context.push_str(&format!("- ({}) {}\n", block.titulo, item));
                }
            }
        }

        context
    }
}
