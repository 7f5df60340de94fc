//! Decision Policies
//!
//! Two interchangeable strategies decide the orchestrator's next action:
//! a deterministic rule engine (stage 1) and an adaptive policy that
//! delegates the choice to the generative backend (stage 2). Both produce
//! the same action vocabulary.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::drafting::prompts;
use crate::domain::drafting::{
    ContestacionSessionState, DraftingError, OrchestratorAction, OrchestratorInput,
};
use crate::domain::foundation::BlockId;
use crate::ports::{complete_structured_as, GenerativeBackend, StructuredRequest};

/// Strategy seam: decides the next orchestrator action.
#[async_trait]
pub trait DecisionPolicy: Send + Sync {
    /// Chooses the next action for the session.
    async fn decide(
        &self,
        state: Option<&ContestacionSessionState>,
        input: &OrchestratorInput,
    ) -> OrchestratorAction;
}

/// Reason attached when the demand text is still missing.
const REASON_TEXT_REQUIRED: &str = "Se requiere el texto de la demanda";
/// Reason attached when text is missing but a session already exists.
const REASON_TEXT_REQUIRED_PARSE: &str =
    "Se requiere el texto de la demanda para parsear los bloques";

/// Stage-1 deterministic policy: a pure function of `(state, texto)`.
#[derive(Debug, Clone, Default)]
pub struct RulePolicy;

impl RulePolicy {
    /// Creates the rule policy.
    pub fn new() -> Self {
        Self
    }

    /// Pure decision table, exposed for direct unit testing.
    pub fn next_action(
        state: Option<&ContestacionSessionState>,
        input: &OrchestratorInput,
    ) -> OrchestratorAction {
        match state {
            None => {
                if input.has_text() {
                    OrchestratorAction::Parse
                } else {
                    OrchestratorAction::wait_user(REASON_TEXT_REQUIRED)
                }
            }
            Some(state) if !state.has_blocks() => {
                if input.has_text() {
                    OrchestratorAction::Parse
                } else {
                    OrchestratorAction::wait_user(REASON_TEXT_REQUIRED_PARSE)
                }
            }
            Some(_) => OrchestratorAction::Complete,
        }
    }
}

#[async_trait]
impl DecisionPolicy for RulePolicy {
    async fn decide(
        &self,
        state: Option<&ContestacionSessionState>,
        input: &OrchestratorInput,
    ) -> OrchestratorAction {
        Self::next_action(state, input)
    }
}

/// Wire shape of the adaptive policy's structured backend response.
#[derive(Debug, Deserialize)]
struct DecisionResponse {
    accion: String,
    #[serde(default)]
    motivo: Option<String>,
    #[serde(default)]
    bloque_ids: Vec<BlockId>,
}

/// Stage-2 adaptive policy: summarizes session progress and delegates the
/// choice to the generative backend, with a local heuristic fallback.
#[derive(Clone)]
pub struct AdaptivePolicy {
    backend: Arc<dyn GenerativeBackend>,
}

impl AdaptivePolicy {
    /// Creates an adaptive policy over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Summarizes the counts the backend needs to apply the rule ordering.
    fn build_summary(state: &ContestacionSessionState) -> String {
        let mut summary = format!(
            "Bloques: {} (tipos: {})\nAnálisis: {}\nPreguntas generadas: {}\nRespuestas: {}\n",
            state.bloques.len(),
            state
                .bloques
                .iter()
                .map(|b| format!("{}={:?}", b.id, b.tipo))
                .collect::<Vec<_>>()
                .join(", "),
            state.analisis_por_bloque.len(),
            state.preguntas_generadas.len(),
            state.respuestas_usuario.len(),
        );

        summary.push_str("Detalle de respuestas:\n");
        for block in &state.bloques {
            match state.respuestas_usuario.get(&block.id) {
                Some(response) => summary.push_str(&format!(
                    "- {} ({:?}): postura {}, fundamentación {}\n",
                    block.id,
                    block.tipo,
                    response.postura.label(),
                    if response.fundamentacion.is_some() {
                        "presente"
                    } else {
                        "ausente"
                    }
                )),
                None => summary.push_str(&format!("- {} ({:?}): sin respuesta\n", block.id, block.tipo)),
            }
        }
        summary
    }

    /// Maps a validated backend choice onto the action vocabulary.
    fn to_action(
        state: &ContestacionSessionState,
        response: DecisionResponse,
    ) -> Result<OrchestratorAction, DraftingError> {
        let accion = response.accion.clone();
        let motivo = response.motivo.unwrap_or_default();
        match response.accion.as_str() {
            "analyze" => Ok(OrchestratorAction::Analyze),
            "generate_questions" => Ok(OrchestratorAction::GenerateQuestions {
                bloque_ids: if response.bloque_ids.is_empty() {
                    None
                } else {
                    Some(response.bloque_ids)
                },
            }),
            "wait_user" => Ok(OrchestratorAction::WaitUser {
                reason: if motivo.is_empty() {
                    "Faltan respuestas del profesional".to_string()
                } else {
                    motivo
                },
            }),
            "need_more_info" => {
                // Keep only ids that exist in the session.
                let bloque_ids: Vec<BlockId> = response
                    .bloque_ids
                    .into_iter()
                    .filter(|id| state.block(id).is_some())
                    .collect();
                Ok(OrchestratorAction::NeedMoreInfo {
                    bloque_ids,
                    reason: if motivo.is_empty() {
                        "Quedan bloques críticos sin respuesta".to_string()
                    } else {
                        motivo
                    },
                })
            }
            "ready_for_redaction" => Ok(OrchestratorAction::ReadyForRedaction),
            _ => Err(DraftingError::UnknownActionTransition(accion)),
        }
    }

    /// Local heuristic applied when the backend call fails or returns an
    /// action outside the vocabulary.
    fn heuristic(state: &ContestacionSessionState) -> OrchestratorAction {
        if !state.preguntas_generadas.is_empty()
            && state.respuestas_usuario.len() < state.bloques.len()
        {
            return OrchestratorAction::wait_user("Faltan respuestas a las preguntas generadas");
        }
        if state.all_blocks_answered() {
            return OrchestratorAction::ReadyForRedaction;
        }
        OrchestratorAction::wait_user("No se pudo decidir el próximo paso, intente nuevamente")
    }
}

#[async_trait]
impl DecisionPolicy for AdaptivePolicy {
    async fn decide(
        &self,
        state: Option<&ContestacionSessionState>,
        input: &OrchestratorInput,
    ) -> OrchestratorAction {
        let Some(state) = state.filter(|s| s.has_blocks()) else {
            // Nothing to summarize yet; the rule table covers this stage.
            return RulePolicy::next_action(state, input);
        };

        let request = StructuredRequest::new(
            prompts::DECISION_SYSTEM_PROMPT,
            Self::build_summary(state),
            prompts::decision_schema(),
        )
        .with_temperature(0.0);

        match complete_structured_as::<DecisionResponse>(self.backend.as_ref(), request).await {
            Ok(response) => match Self::to_action(state, response) {
                Ok(action) => action,
                Err(err) => {
                    tracing::warn!(error = %err, "adaptive policy chose an unknown action, applying heuristic");
                    Self::heuristic(state)
                }
            },
            Err(err) => {
                let err = DraftingError::DecisionFailure(err.to_string());
                tracing::warn!(error = %err, "adaptive decision failed, applying heuristic");
                Self::heuristic(state)
            }
        }
    }
}
