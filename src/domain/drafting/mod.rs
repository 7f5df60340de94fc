//! Drafting orchestration core.
//!
//! A multi-stage state machine over [`ContestacionSessionState`]: some
//! transitions are deterministic rules, others delegate to the generative
//! backend. Every transition is a pure, serializable state transformation,
//! so a session survives across many independent invocations.

mod actions;
mod analyzer;
mod consolidator;
mod errors;
mod orchestrator;
mod parser;
mod policy;
pub(crate) mod prompts;
mod question_generator;
mod selector;
mod session_state;

pub use actions::OrchestratorAction;
pub use analyzer::BlockAnalyzer;
pub use consolidator::ResponseConsolidator;
pub use errors::DraftingError;
pub use orchestrator::{DraftingOrchestrator, OrchestratorInput};
pub use parser::{DemandParser, ParsedDemand};
pub use policy::{AdaptivePolicy, DecisionPolicy, RulePolicy};
pub use question_generator::QuestionGenerator;
pub use selector::VariantSelector;
pub use session_state::ContestacionSessionState;
