//! Error taxonomy for the drafting core.
//!
//! Backend failures inside the components are caught at each component
//! boundary, logged and converted into a safe degraded result; these types
//! mostly classify what is logged. Only boundary validation
//! (`UnknownBlock`) surfaces to the caller.

use thiserror::Error;

use crate::domain::foundation::BlockId;

/// Failures inside the drafting pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftingError {
    /// Backend call for parsing failed or returned empty.
    #[error("demand parsing failed: {0}")]
    ParseFailure(String),

    /// Block analysis backend call failed.
    #[error("block analysis failed: {0}")]
    AnalysisFailure(String),

    /// Question generation backend call failed.
    #[error("question generation failed: {0}")]
    QuestionGenerationFailure(String),

    /// Consolidation backend call failed.
    #[error("response consolidation failed: {0}")]
    ConsolidationFailure(String),

    /// Variant selection backend call failed.
    #[error("variant selection failed: {0}")]
    SelectionFailure(String),

    /// Adaptive decision policy backend call failed.
    #[error("decision failed: {0}")]
    DecisionFailure(String),

    /// Action tag not wired to a real transition.
    #[error("no transition wired for action: {0}")]
    UnknownActionTransition(String),

    /// A response referenced a block id that does not exist in the session.
    #[error("unknown block id: {0}")]
    UnknownBlock(BlockId),
}
