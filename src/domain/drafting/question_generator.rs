//! Question Generator
//!
//! Produces clarifying questions for the professional, per block or for a
//! targeted subset when the decision policy asks for follow-up on specific
//! blocks.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::demanda::{BlockAnalysis, BlockQuestion, DemandBlock};
use crate::domain::drafting::{prompts, DraftingError};
use crate::domain::foundation::BlockId;
use crate::ports::{complete_structured_as, GenerativeBackend, StructuredRequest};

/// Wire shape of the question generator's structured backend response.
#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    #[serde(default)]
    preguntas: Vec<BlockQuestion>,
}

/// Generates clarifying questions from blocks and their analyses.
#[derive(Clone)]
pub struct QuestionGenerator {
    backend: Arc<dyn GenerativeBackend>,
    max_tokens: u32,
}

impl QuestionGenerator {
    /// Creates a generator over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            max_tokens: 4096,
        }
    }

    /// Sets the completion budget for the generation call.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generates questions for the given blocks.
    ///
    /// When `filter` is supplied, generation is restricted to the named
    /// blocks. Failures degrade to an empty list; questions referencing
    /// unknown block ids are discarded.
    pub async fn generate(
        &self,
        blocks: &[DemandBlock],
        analysis_by_block: &HashMap<BlockId, BlockAnalysis>,
        filter: Option<&[BlockId]>,
    ) -> Vec<BlockQuestion> {
        let scoped: Vec<&DemandBlock> = match filter {
            Some(ids) => {
                let wanted: HashSet<_> = ids.iter().collect();
                blocks.iter().filter(|b| wanted.contains(&b.id)).collect()
            }
            None => blocks.iter().collect(),
        };

        if scoped.is_empty() {
            return Vec::new();
        }

        let request = StructuredRequest::new(
            prompts::QUESTION_SYSTEM_PROMPT,
            Self::build_context(&scoped, analysis_by_block),
            prompts::questions_schema(),
        )
        .with_max_tokens(self.max_tokens)
        .with_temperature(0.3);

        match complete_structured_as::<QuestionsResponse>(self.backend.as_ref(), request).await {
            Ok(response) => {
                let known: HashSet<_> = scoped.iter().map(|b| &b.id).collect();
                response
                    .preguntas
                    .into_iter()
                    .filter(|q| known.contains(&q.bloque_id))
                    .collect()
            }
            Err(err) => {
                let err = DraftingError::QuestionGenerationFailure(err.to_string());
                tracing::warn!(error = %err, "returning no questions");
                Vec::new()
            }
        }
    }

    fn build_context(
        blocks: &[&DemandBlock],
        analysis_by_block: &HashMap<BlockId, BlockAnalysis>,
    ) -> String {
        let mut context = String::from("BLOQUES A CUBRIR:\n");
        for block in blocks {
            context.push_str(&format!(
                "\n[{}] {} (tipo: {:?})\n{}\n",
                block.id, block.titulo, block.tipo, block.contenido
            ));
            if let Some(analysis) = analysis_by_block.get(&block.id) {
                if !analysis.puntos_debiles.is_empty() {
                    context.push_str(&format!(
                        "Puntos débiles detectados: {}\n",
                        analysis.puntos_debiles.join("; ")
                    ));
                }
                if !analysis.sugerencias_defensa.is_empty() {
                    context.push_str(&format!(
                        "Sugerencias de defensa: {}\n",
                        analysis.sugerencias_defensa.join("; ")
                    ));
                }
            }
        }
        context
    }
}
