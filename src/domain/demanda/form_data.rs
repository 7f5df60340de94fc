//! Canonical consolidated document fields.

use serde::{Deserialize, Serialize};

/// The five canonical sections of a contestación document.
///
/// Fields are always present; an empty string means the section does not
/// apply. This is the degraded-but-valid shape returned on any
/// consolidation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormDataConsolidado {
    #[serde(default)]
    pub hechos_admitidos: String,
    #[serde(default)]
    pub hechos_negados: String,
    #[serde(default)]
    pub defensas: String,
    #[serde(default)]
    pub excepciones: String,
    #[serde(default)]
    pub prueba: String,
}

impl FormDataConsolidado {
    /// True when no section has content.
    pub fn is_empty(&self) -> bool {
        self.hechos_admitidos.is_empty()
            && self.hechos_negados.is_empty()
            && self.defensas.is_empty()
            && self.excepciones.is_empty()
            && self.prueba.is_empty()
    }
}
