//! Contestia - Guided Drafting Orchestrator
//!
//! This crate implements the drafting flow for contesting a formal legal
//! demand ("contestación de demanda"): demand parsing, per-block analysis,
//! an adaptive question/answer loop, response consolidation, template
//! variant selection and draft generation, all driven by pure, replayable
//! state transitions over a single serializable session aggregate.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
