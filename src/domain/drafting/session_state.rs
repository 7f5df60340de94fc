//! Session State Aggregate
//!
//! The single JSON-serializable value that fully describes drafting
//! progress. It is the exact contract persisted by the external session
//! store; the core receives and returns this shape with no hidden fields.
//! All fields carry serde defaults so partial blobs written by earlier
//! versions still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::demanda::{
    BlockAnalysis, BlockQuestion, BlockResponse, DemandBlock, FormDataConsolidado,
};
use crate::domain::foundation::BlockId;

/// Complete state of one contestación drafting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContestacionSessionState {
    #[serde(default)]
    pub bloques: Vec<DemandBlock>,
    #[serde(default)]
    pub categoria_detectada: Option<String>,
    #[serde(default)]
    pub pretensiones_principales: Vec<String>,
    #[serde(default)]
    pub analisis_por_bloque: HashMap<BlockId, BlockAnalysis>,
    #[serde(default)]
    pub preguntas_generadas: Vec<BlockQuestion>,
    #[serde(default)]
    pub respuestas_usuario: HashMap<BlockId, BlockResponse>,
    /// Derived: block ids (in `orden` order) without a recorded response.
    /// Recomputed whenever blocks or responses change.
    #[serde(default)]
    pub bloques_sin_respuesta: Vec<BlockId>,
    #[serde(default)]
    pub datos_consolidados: Option<FormDataConsolidado>,
    #[serde(default)]
    pub listo_para_redaccion: bool,
    #[serde(default)]
    pub ultima_accion: Option<String>,
    #[serde(default)]
    pub ultima_accion_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variante_seleccionada: Option<String>,
    #[serde(default)]
    pub borrador_id: Option<String>,
    #[serde(default)]
    pub borrador_contenido: Option<String>,
    #[serde(default)]
    pub borrador_generado_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ultima_iteracion_at: Option<DateTime<Utc>>,
}

impl ContestacionSessionState {
    /// Creates an empty session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the parser has produced at least one block.
    pub fn has_blocks(&self) -> bool {
        !self.bloques.is_empty()
    }

    /// Looks up a block by id.
    pub fn block(&self, id: &BlockId) -> Option<&DemandBlock> {
        self.bloques.iter().find(|b| &b.id == id)
    }

    /// Block ids in document order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ordered: Vec<&DemandBlock> = self.bloques.iter().collect();
        ordered.sort_by_key(|b| b.orden);
        ordered.into_iter().map(|b| b.id.clone()).collect()
    }

    /// Recomputes `bloques_sin_respuesta` from blocks and responses.
    pub fn recompute_unanswered(&mut self) {
        self.bloques_sin_respuesta = self
            .block_ids()
            .into_iter()
            .filter(|id| !self.respuestas_usuario.contains_key(id))
            .collect();
    }

    /// True when every block has a recorded response.
    pub fn all_blocks_answered(&self) -> bool {
        self.has_blocks()
            && self
                .bloques
                .iter()
                .all(|b| self.respuestas_usuario.contains_key(&b.id))
    }

    /// Stamps the free-form audit pair.
    pub fn stamp_action(&mut self, tag: &str) {
        self.ultima_accion = Some(tag.to_string());
        self.ultima_accion_at = Some(Utc::now());
    }
}
