//! Data model for a parsed legal demand and the professional's responses.
//!
//! Wire names are the Spanish contract names persisted in the session blob
//! (`titulo`, `contenido`, `postura`, ...); they are shared with the
//! external session store and must not drift.

mod analysis;
mod block;
mod form_data;
mod question;
mod response;

pub use analysis::BlockAnalysis;
pub use block::{BlockKind, DemandBlock};
pub use form_data::FormDataConsolidado;
pub use question::{BlockQuestion, QuestionKind};
pub use response::{BlockResponse, Postura};
