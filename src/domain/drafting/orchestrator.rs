//! Orchestrator Core
//!
//! `execute_action` is a total function over the action tag: given the
//! current session state and the next action it returns a brand-new state
//! value. The input state is never mutated; callers persist the result
//! only after a successful return, which keeps each action at-most-once.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::demanda::BlockResponse;
use crate::domain::drafting::{
    BlockAnalyzer, ContestacionSessionState, DecisionPolicy, DemandParser, DraftingError,
    OrchestratorAction, QuestionGenerator, ResponseConsolidator, VariantSelector,
};
use crate::domain::foundation::BlockId;
use crate::ports::{DraftGenerator, DraftRequest, GenerativeBackend, VariantRegistry};

/// Default document type key used against the variant registry.
const DEFAULT_DOCUMENT_TYPE: &str = "contestacion";

/// Auxiliary input for one orchestrator invocation, shared by the decision
/// policies and the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorInput {
    /// Raw demand text (needed by `parse` and `analyze`).
    pub texto_demanda: Option<String>,
}

impl OrchestratorInput {
    /// Creates an input carrying demand text.
    pub fn with_text(texto: impl Into<String>) -> Self {
        Self {
            texto_demanda: Some(texto.into()),
        }
    }

    /// True when non-whitespace demand text is present.
    pub fn has_text(&self) -> bool {
        self.text().is_some()
    }

    pub(crate) fn text(&self) -> Option<&str> {
        self.texto_demanda
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Drives the contestación drafting flow.
///
/// Holds no per-session state: every invocation receives the session blob
/// from the caller and returns a new one, so many sessions can run
/// concurrently as long as each session's actions are serialized
/// externally.
pub struct DraftingOrchestrator {
    parser: DemandParser,
    analyzer: BlockAnalyzer,
    question_generator: QuestionGenerator,
    consolidator: ResponseConsolidator,
    selector: VariantSelector,
    policy: Arc<dyn DecisionPolicy>,
    variant_registry: Arc<dyn VariantRegistry>,
    draft_generator: Arc<dyn DraftGenerator>,
    document_type: String,
}

impl DraftingOrchestrator {
    /// Creates an orchestrator wiring all components over one backend.
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        policy: Arc<dyn DecisionPolicy>,
        variant_registry: Arc<dyn VariantRegistry>,
        draft_generator: Arc<dyn DraftGenerator>,
    ) -> Self {
        Self {
            parser: DemandParser::new(backend.clone()),
            analyzer: BlockAnalyzer::new(backend.clone()),
            question_generator: QuestionGenerator::new(backend.clone()),
            consolidator: ResponseConsolidator::new(backend.clone()),
            selector: VariantSelector::new(backend),
            policy,
            variant_registry,
            draft_generator,
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
        }
    }

    /// Sets the document type key used against the variant registry.
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    /// Asks the active decision policy for the next action.
    pub async fn decide(
        &self,
        state: Option<&ContestacionSessionState>,
        input: &OrchestratorInput,
    ) -> OrchestratorAction {
        self.policy.decide(state, input).await
    }

    /// Applies `action` to `current`, returning the new session state.
    ///
    /// Total over the action tag. Identity actions (`wait_user`,
    /// `need_more_info`, `complete`, `error`) return a value equal to the
    /// input; every other successful branch stamps the audit pair.
    pub async fn execute_action(
        &self,
        action: &OrchestratorAction,
        current: Option<&ContestacionSessionState>,
        input: &OrchestratorInput,
    ) -> ContestacionSessionState {
        let base = current.cloned().unwrap_or_default();

        match action {
            OrchestratorAction::Parse => self.apply_parse(base, input).await,
            OrchestratorAction::Analyze => self.apply_analyze(base, input).await,
            OrchestratorAction::GenerateQuestions { bloque_ids } => {
                self.apply_generate_questions(base, bloque_ids.as_deref(), action)
                    .await
            }
            OrchestratorAction::ReadyForRedaction => self.apply_consolidate(base, action).await,
            OrchestratorAction::SelectStructure => self.apply_select_structure(base, action).await,
            OrchestratorAction::GenerateDraft => self.apply_generate_draft(base, action).await,
            OrchestratorAction::IterateDraft { instrucciones } => {
                self.apply_iterate_draft(base, instrucciones.as_deref(), action)
                    .await
            }
            OrchestratorAction::SaveDraft => {
                // Persistence belongs to the caller; only record intent.
                let mut state = base;
                state.stamp_action(action.tag());
                state
            }
            OrchestratorAction::BackToContext => {
                let mut state = base;
                state.listo_para_redaccion = false;
                state.stamp_action(action.tag());
                state
            }
            OrchestratorAction::WaitUser { .. }
            | OrchestratorAction::NeedMoreInfo { .. }
            | OrchestratorAction::Complete
            | OrchestratorAction::Error { .. } => base,
        }
    }

    /// Merges externally collected responses into a new state.
    ///
    /// Every `bloque_id` must reference an existing block; the map is
    /// validated here rather than trusted from the caller.
    pub fn record_responses(
        &self,
        current: &ContestacionSessionState,
        responses: HashMap<BlockId, BlockResponse>,
    ) -> Result<ContestacionSessionState, DraftingError> {
        for (id, response) in &responses {
            if current.block(id).is_none() {
                return Err(DraftingError::UnknownBlock(id.clone()));
            }
            if &response.bloque_id != id {
                return Err(DraftingError::UnknownBlock(response.bloque_id.clone()));
            }
        }

        let mut state = current.clone();
        state.respuestas_usuario.extend(responses);
        state.recompute_unanswered();
        Ok(state)
    }

    async fn apply_parse(
        &self,
        base: ContestacionSessionState,
        input: &OrchestratorInput,
    ) -> ContestacionSessionState {
        let Some(texto) = input.text() else {
            return base;
        };

        let parsed = self.parser.parse(texto).await;
        let mut state = base;
        state.bloques = parsed.bloques;
        state.categoria_detectada = parsed.categoria_detectada;
        state.pretensiones_principales = parsed.pretensiones_principales;
        state.recompute_unanswered();
        state.stamp_action("parse");
        state
    }

    async fn apply_analyze(
        &self,
        base: ContestacionSessionState,
        input: &OrchestratorInput,
    ) -> ContestacionSessionState {
        let Some(texto) = input.text() else {
            return base;
        };
        if !base.has_blocks() {
            return base;
        }

        let analyses = self.analyzer.analyze(&base.bloques, texto).await;
        let mut state = base;
        state.analisis_por_bloque = analyses
            .into_iter()
            .map(|a| (a.bloque_id.clone(), a))
            .collect();
        state.stamp_action("analyze");
        state
    }

    async fn apply_generate_questions(
        &self,
        base: ContestacionSessionState,
        filter: Option<&[BlockId]>,
        action: &OrchestratorAction,
    ) -> ContestacionSessionState {
        let questions = self
            .question_generator
            .generate(&base.bloques, &base.analisis_por_bloque, filter)
            .await;

        let mut state = base;
        state.preguntas_generadas = questions;
        state.stamp_action(action.tag());
        state
    }

    async fn apply_consolidate(
        &self,
        base: ContestacionSessionState,
        action: &OrchestratorAction,
    ) -> ContestacionSessionState {
        let datos = self
            .consolidator
            .consolidate(&base.respuestas_usuario, &base.bloques)
            .await;

        let mut state = base;
        state.datos_consolidados = Some(datos);
        state.listo_para_redaccion = true;
        state.stamp_action(action.tag());
        state
    }

    async fn apply_select_structure(
        &self,
        base: ContestacionSessionState,
        action: &OrchestratorAction,
    ) -> ContestacionSessionState {
        let available = match self
            .variant_registry
            .available_variants(&self.document_type)
            .await
        {
            Ok(variants) => variants,
            Err(err) => {
                tracing::warn!(error = %err, "variant registry unavailable, using standard template");
                Vec::new()
            }
        };

        let variant = self
            .selector
            .select(base.categoria_detectada.as_deref(), &base.bloques, &available)
            .await;

        let mut state = base;
        state.variante_seleccionada = Some(variant);
        state.stamp_action(action.tag());
        state
    }

    async fn apply_generate_draft(
        &self,
        base: ContestacionSessionState,
        action: &OrchestratorAction,
    ) -> ContestacionSessionState {
        let Some(datos) = base.datos_consolidados.clone() else {
            tracing::warn!("generate_draft without consolidated data, state unchanged");
            return base;
        };
        if !base.listo_para_redaccion {
            tracing::warn!("generate_draft before ready_for_redaction, state unchanged");
            return base;
        }

        let request = DraftRequest {
            variante: base.variante_seleccionada.clone().unwrap_or_default(),
            datos,
            categoria: base.categoria_detectada.clone(),
            partes: None,
        };

        match self.draft_generator.generate(request).await {
            Ok(draft) => {
                let mut state = base;
                state.borrador_id = Some(draft.id);
                state.borrador_contenido = Some(draft.contenido);
                state.borrador_generado_at = Some(draft.generado_at);
                state.stamp_action(action.tag());
                state
            }
            Err(err) => {
                tracing::warn!(error = %err, "draft generation failed, state unchanged");
                base
            }
        }
    }

    async fn apply_iterate_draft(
        &self,
        base: ContestacionSessionState,
        instrucciones: Option<&str>,
        action: &OrchestratorAction,
    ) -> ContestacionSessionState {
        let (Some(id), Some(contenido), Some(generado_at)) = (
            base.borrador_id.clone(),
            base.borrador_contenido.clone(),
            base.borrador_generado_at,
        ) else {
            tracing::warn!("iterate_draft without an existing draft, state unchanged");
            return base;
        };

        let draft = crate::ports::Draft {
            id,
            contenido,
            generado_at,
        };
        let instrucciones = instrucciones.unwrap_or("Mejorá la redacción del borrador");

        match self.draft_generator.iterate(&draft, instrucciones).await {
            Ok(updated) => {
                let mut state = base;
                state.borrador_contenido = Some(updated.contenido);
                state.ultima_iteracion_at = Some(chrono::Utc::now());
                state.stamp_action(action.tag());
                state
            }
            Err(err) => {
                tracing::warn!(error = %err, "draft iteration failed, state unchanged");
                base
            }
        }
    }
}
