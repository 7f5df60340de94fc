//! The professional's responses, one per demand block.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BlockId;

/// The professional's stance toward a block's factual claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Postura {
    Admitir,
    Negar,
    AdmitirParcial,
    NegarConMatices,
    /// The professional explicitly declined to take a position.
    SinPosicion,
}

impl Postura {
    /// Human-readable Spanish label, used when building backend context.
    pub fn label(&self) -> &'static str {
        match self {
            Postura::Admitir => "admite",
            Postura::Negar => "niega",
            Postura::AdmitirParcial => "admite parcialmente",
            Postura::NegarConMatices => "niega con matices",
            Postura::SinPosicion => "sin posición",
        }
    }
}

/// A response to one demand block.
///
/// `bloque_id` must reference an existing block in the same session;
/// validated at the orchestrator boundary rather than trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub bloque_id: BlockId,
    pub postura: Postura,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fundamentacion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prueba_ofrecida: Option<Vec<String>>,
}

impl BlockResponse {
    /// Creates a response with a stance only.
    pub fn new(bloque_id: impl Into<BlockId>, postura: Postura) -> Self {
        Self {
            bloque_id: bloque_id.into(),
            postura,
            fundamentacion: None,
            prueba_ofrecida: None,
        }
    }

    /// Attaches a justification.
    pub fn with_fundamentacion(mut self, texto: impl Into<String>) -> Self {
        self.fundamentacion = Some(texto.into());
        self
    }

    /// Attaches offered evidence.
    pub fn with_prueba(mut self, prueba: Vec<String>) -> Self {
        self.prueba_ofrecida = Some(prueba);
        self
    }

    /// Whether this response contributes to the admitted/denied synthesis.
    pub fn takes_position(&self) -> bool {
        self.postura != Postura::SinPosicion
    }
}
