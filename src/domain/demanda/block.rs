//! Demand blocks: titled, ordered units of the original demand text.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BlockId;

/// Coarse category of a demand block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Object of the claim (what is being demanded).
    Objeto,
    /// Factual allegations.
    Hechos,
    /// Claimed amounts / line items.
    Rubros,
    /// Offered evidence.
    Prueba,
    /// Final petition to the court.
    Petitorio,
    /// Anything that does not fit the above.
    #[default]
    Otro,
}

impl BlockKind {
    /// Categories whose blocks must be answered before redaction can start.
    pub fn is_critical(&self) -> bool {
        matches!(self, BlockKind::Objeto | BlockKind::Hechos | BlockKind::Petitorio)
    }
}

/// A titled, ordered unit of the original demand text.
///
/// `orden` values form a total order consistent with document appearance;
/// `id` is referenced by every downstream per-block map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandBlock {
    pub id: BlockId,
    pub titulo: String,
    pub contenido: String,
    #[serde(default)]
    pub tipo: BlockKind,
    pub orden: u32,
}

impl DemandBlock {
    /// Creates a new demand block.
    pub fn new(
        id: impl Into<BlockId>,
        titulo: impl Into<String>,
        contenido: impl Into<String>,
        tipo: BlockKind,
        orden: u32,
    ) -> Self {
        Self {
            id: id.into(),
            titulo: titulo.into(),
            contenido: contenido.into(),
            tipo,
            orden,
        }
    }

    /// The single fallback block used when parsing yields nothing usable.
    ///
    /// Guarantees the pipeline always has at least one addressable unit for
    /// any non-empty input.
    pub fn fallback(raw_text: &str) -> Self {
        Self {
            id: BlockId::new("bloque_1"),
            titulo: "Contenido completo".to_string(),
            contenido: raw_text.trim().to_string(),
            tipo: BlockKind::Otro,
            orden: 1,
        }
    }
}
