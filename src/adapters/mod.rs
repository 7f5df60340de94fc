//! Adapters: concrete implementations of the ports.

pub mod ai;
mod composition;
pub mod drafting;

pub use composition::{orchestrator_from_config, orchestrator_with_backend, policy_from_config};
