//! The orchestrator action vocabulary.
//!
//! A closed tagged union: the control contract between a decision policy
//! and the dispatcher. Callers may also construct actions directly, e.g. to
//! force `ready_for_redaction`. Serialized adjacently tagged as
//! `{"type": ..., "payload": ...}`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BlockId;

/// Next action for the orchestrator to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum OrchestratorAction {
    /// Parse the raw demand text into blocks.
    Parse,
    /// Analyze the parsed blocks.
    Analyze,
    /// Generate clarifying questions, optionally scoped to specific blocks.
    GenerateQuestions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bloque_ids: Option<Vec<BlockId>>,
    },
    /// Wait for the professional; carries a human-readable reason.
    WaitUser { reason: String },
    /// Targeted follow-up: named blocks still need answers.
    NeedMoreInfo {
        bloque_ids: Vec<BlockId>,
        reason: String,
    },
    /// Consolidate responses and mark the session ready for redaction.
    ReadyForRedaction,
    /// Select the document template variant.
    SelectStructure,
    /// Generate a first draft.
    GenerateDraft,
    /// Refine the current draft.
    IterateDraft {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instrucciones: Option<String>,
    },
    /// Persisting the draft is the caller's job; this only records intent.
    SaveDraft,
    /// Reopen the question/answer context.
    BackToContext,
    /// The flow has nothing left to do.
    Complete,
    /// Unrecoverable condition expressed by a caller; the core never
    /// manufactures this internally.
    Error { message: String },
}

impl OrchestratorAction {
    /// The wire tag of this action, as stamped into the audit pair.
    pub fn tag(&self) -> &'static str {
        match self {
            OrchestratorAction::Parse => "parse",
            OrchestratorAction::Analyze => "analyze",
            OrchestratorAction::GenerateQuestions { .. } => "generate_questions",
            OrchestratorAction::WaitUser { .. } => "wait_user",
            OrchestratorAction::NeedMoreInfo { .. } => "need_more_info",
            OrchestratorAction::ReadyForRedaction => "ready_for_redaction",
            OrchestratorAction::SelectStructure => "select_structure",
            OrchestratorAction::GenerateDraft => "generate_draft",
            OrchestratorAction::IterateDraft { .. } => "iterate_draft",
            OrchestratorAction::SaveDraft => "save_draft",
            OrchestratorAction::BackToContext => "back_to_context",
            OrchestratorAction::Complete => "complete",
            OrchestratorAction::Error { .. } => "error",
        }
    }

    /// Convenience constructor for a wait with a reason.
    pub fn wait_user(reason: impl Into<String>) -> Self {
        OrchestratorAction::WaitUser {
            reason: reason.into(),
        }
    }
}
