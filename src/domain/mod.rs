//! Domain layer: the demand data model and the drafting orchestration core.

pub mod demanda;
pub mod drafting;
pub mod foundation;
