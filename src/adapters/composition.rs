//! Composition root: builds the drafting stack from `AppConfig`.
//!
//! The orchestrator itself is config-agnostic; this module is the single
//! place where configuration values become wired components.

use std::sync::Arc;

use crate::adapters::ai::{AnthropicBackend, AnthropicConfig};
use crate::adapters::drafting::BackendDraftGenerator;
use crate::config::{AppConfig, PolicyKind};
use crate::domain::drafting::{AdaptivePolicy, DecisionPolicy, DraftingOrchestrator, RulePolicy};
use crate::ports::{GenerativeBackend, VariantRegistry};

/// Maps the configured policy kind onto a concrete decision policy.
pub fn policy_from_config(
    kind: &PolicyKind,
    backend: &Arc<dyn GenerativeBackend>,
) -> Arc<dyn DecisionPolicy> {
    match kind {
        PolicyKind::Deterministic => Arc::new(RulePolicy::new()),
        PolicyKind::Adaptive => Arc::new(AdaptivePolicy::new(backend.clone())),
    }
}

/// Builds the orchestrator from configuration over an explicit backend.
///
/// The backend is injected rather than built here so the same wiring runs
/// against the Anthropic API or a test double.
pub fn orchestrator_with_backend(
    config: &AppConfig,
    backend: Arc<dyn GenerativeBackend>,
    variant_registry: Arc<dyn VariantRegistry>,
) -> DraftingOrchestrator {
    let policy = policy_from_config(&config.drafting.decision_policy, &backend);
    let draft_generator = Arc::new(
        BackendDraftGenerator::new(backend.clone()).with_max_tokens(config.drafting.max_tokens),
    );

    DraftingOrchestrator::new(backend, policy, variant_registry, draft_generator)
        .with_document_type(config.drafting.document_type.clone())
}

/// Builds the production orchestrator: Anthropic backend from `config.ai`,
/// policy and drafting knobs from `config.drafting`.
pub fn orchestrator_from_config(
    config: &AppConfig,
    variant_registry: Arc<dyn VariantRegistry>,
) -> DraftingOrchestrator {
    let backend: Arc<dyn GenerativeBackend> =
        Arc::new(AnthropicBackend::new(AnthropicConfig::from(&config.ai)));
    orchestrator_with_backend(config, backend, variant_registry)
}
