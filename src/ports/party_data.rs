//! Party Data Port - formatted party information for a case.
//!
//! Boundary-only: the consolidated form fields and this provider's output
//! are merged by the caller before invoking the draft generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::CaseId;

/// Structured data about one party to the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domicilio: Option<String>,
}

impl PartyInfo {
    /// Creates party info with a name only.
    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            documento: None,
            domicilio: None,
        }
    }

    /// Sets the identity document.
    pub fn with_documento(mut self, documento: impl Into<String>) -> Self {
        self.documento = Some(documento.into());
        self
    }

    /// Sets the registered address.
    pub fn with_domicilio(mut self, domicilio: impl Into<String>) -> Self {
        self.domicilio = Some(domicilio.into());
        self
    }
}

/// Formatted and structured party data for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyData {
    /// "Our client" formatted presentation text.
    pub cliente_texto: String,
    /// Opposing party formatted presentation text.
    pub contraparte_texto: String,
    pub cliente: PartyInfo,
    pub contraparte: PartyInfo,
}

/// Port for resolving party data from a case identifier.
#[async_trait]
pub trait PartyDataProvider: Send + Sync {
    /// Returns formatted client/opposing-party data for a case.
    async fn party_data(&self, case_id: &CaseId) -> Result<PartyData, PartyDataError>;
}

/// Party data errors.
#[derive(Debug, thiserror::Error)]
pub enum PartyDataError {
    /// No case with the given id.
    #[error("case not found: {0}")]
    CaseNotFound(CaseId),

    /// Provider backend unavailable.
    #[error("party data unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_info_builder() {
        let info = PartyInfo::new("Juan Pérez")
            .with_documento("DNI 12.345.678")
            .with_domicilio("Av. Siempre Viva 742");

        assert_eq!(info.nombre, "Juan Pérez");
        assert_eq!(info.documento.as_deref(), Some("DNI 12.345.678"));
        assert_eq!(info.domicilio.as_deref(), Some("Av. Siempre Viva 742"));
    }
}
