//! Draft Generator Port - produces and refines contestación prose.
//!
//! Specified at the contract level: the generation step is itself a call to
//! the generative backend, so the default adapter simply renders through it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::demanda::FormDataConsolidado;
use crate::ports::PartyData;

/// Everything the generator needs to produce a first draft.
#[derive(Debug, Clone)]
pub struct DraftRequest {
    /// Selected template variant key; empty string means the standard
    /// template.
    pub variante: String,
    /// Consolidated canonical fields.
    pub datos: FormDataConsolidado,
    /// Detected demand category, when known.
    pub categoria: Option<String>,
    /// Party data merged in by the caller, when available.
    pub partes: Option<PartyData>,
}

/// A generated draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub contenido: String,
    pub generado_at: DateTime<Utc>,
}

/// Port for generating and iterating drafts.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Produces a first draft from the consolidated fields and the selected
    /// template variant.
    async fn generate(&self, request: DraftRequest) -> Result<Draft, DraftError>;

    /// Refines an existing draft following the professional's instructions.
    async fn iterate(&self, draft: &Draft, instrucciones: &str) -> Result<Draft, DraftError>;
}

/// Draft generation errors.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// The generative backend failed.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// The request lacked the data needed to draft.
    #[error("incomplete draft request: {0}")]
    IncompleteRequest(String),
}
