//! In-Memory Party Data Provider - seeded case/party map for tests and
//! early-stage deployments without a case database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::CaseId;
use crate::ports::{PartyData, PartyDataError, PartyDataProvider, PartyInfo};

/// [`PartyDataProvider`] backed by an in-memory map.
#[derive(Default)]
pub struct InMemoryPartyData {
    cases: Mutex<HashMap<CaseId, PartyData>>,
}

impl InMemoryPartyData {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers party data for a case.
    pub fn insert(&self, case_id: CaseId, data: PartyData) {
        let mut cases = self
            .cases
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cases.insert(case_id, data);
    }
}

/// Builds the formatted presentation text for one party.
pub fn format_party(info: &PartyInfo) -> String {
    let mut text = info.nombre.clone();
    if let Some(documento) = &info.documento {
        text.push_str(&format!(", {}", documento));
    }
    if let Some(domicilio) = &info.domicilio {
        text.push_str(&format!(", con domicilio en {}", domicilio));
    }
    text
}

#[async_trait]
impl PartyDataProvider for InMemoryPartyData {
    async fn party_data(&self, case_id: &CaseId) -> Result<PartyData, PartyDataError> {
        let cases = self
            .cases
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cases
            .get(case_id)
            .cloned()
            .ok_or_else(|| PartyDataError::CaseNotFound(case_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> PartyData {
        let cliente = PartyInfo::new("María Gómez")
            .with_documento("DNI 11.111.111")
            .with_domicilio("Av. Corrientes 1234, CABA");
        let contraparte = PartyInfo::new("Pedro López");
        PartyData {
            cliente_texto: format_party(&cliente),
            contraparte_texto: format_party(&contraparte),
            cliente,
            contraparte,
        }
    }

    #[tokio::test]
    async fn test_returns_registered_case() {
        let provider = InMemoryPartyData::new();
        let case_id = CaseId::new();
        provider.insert(case_id.clone(), sample_data());

        let data = provider.party_data(&case_id).await.unwrap();

        assert_eq!(data.cliente.nombre, "María Gómez");
        assert!(data.cliente_texto.contains("Av. Corrientes 1234"));
    }

    #[tokio::test]
    async fn test_unknown_case_is_an_error() {
        let provider = InMemoryPartyData::new();

        let err = provider.party_data(&CaseId::new()).await.unwrap_err();

        assert!(matches!(err, PartyDataError::CaseNotFound(_)));
    }

    #[test]
    fn test_format_party_with_name_only() {
        assert_eq!(format_party(&PartyInfo::new("Pedro López")), "Pedro López");
    }
}
