//! Clarifying questions put to the professional, one or more per block.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BlockId;

/// What a clarifying question is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// The professional's stance toward the block.
    Postura,
    /// Evidence the professional can offer.
    Prueba,
    /// Legal justification for the stance.
    Fundamentacion,
    #[default]
    Otro,
}

/// A clarifying question about one demand block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockQuestion {
    pub bloque_id: BlockId,
    pub pregunta: String,
    #[serde(default)]
    pub tipo: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opciones_sugeridas: Option<Vec<String>>,
}

impl BlockQuestion {
    /// Creates a new question for a block.
    pub fn new(bloque_id: impl Into<BlockId>, pregunta: impl Into<String>, tipo: QuestionKind) -> Self {
        Self {
            bloque_id: bloque_id.into(),
            pregunta: pregunta.into(),
            tipo,
            opciones_sugeridas: None,
        }
    }

    /// Attaches suggested answer options.
    pub fn with_options(mut self, opciones: Vec<String>) -> Self {
        self.opciones_sugeridas = Some(opciones);
        self
    }
}
