//! Structure/Variant Selector
//!
//! Maps a detected demand category to an available document template
//! variant: direct table lookup first, then an adaptive backend pick
//! clamped to the available list. Empty string means the standard
//! template.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::demanda::DemandBlock;
use crate::domain::drafting::{prompts, DraftingError};
use crate::ports::{complete_structured_as, GenerativeBackend, StructuredRequest};

/// Known category key → preferred variant key.
static CATEGORY_VARIANTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("incumplimiento_locacion", "incumplimiento_locacion"),
        ("desalojo", "desalojo"),
        ("cobro_de_pesos", "cobro_de_pesos"),
        ("danos_y_perjuicios", "danos_y_perjuicios"),
        ("despido", "despido"),
    ])
});

/// Wire shape of the selector's structured backend response.
#[derive(Debug, Deserialize)]
struct SelectionResponse {
    #[serde(default)]
    variante: String,
}

/// Selects the template variant for the contestación.
#[derive(Clone)]
pub struct VariantSelector {
    backend: Arc<dyn GenerativeBackend>,
}

impl VariantSelector {
    /// Creates a selector over the given backend.
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    /// Selects a variant from `available`, or `""` for the standard
    /// template.
    ///
    /// Direct table matches skip the backend entirely. The adaptive
    /// fallback only accepts a value literally present in `available`,
    /// so the backend cannot invent a variant. Any failure yields `""`.
    pub async fn select(
        &self,
        detected_category: Option<&str>,
        blocks: &[DemandBlock],
        available: &[String],
    ) -> String {
        if let Some(category) = detected_category {
            if let Some(&variant) = CATEGORY_VARIANTS.get(category) {
                if available.iter().any(|v| v == variant) {
                    return variant.to_string();
                }
            }
        }

        if available.is_empty() {
            return String::new();
        }

        let request = StructuredRequest::new(
            prompts::SELECTOR_SYSTEM_PROMPT,
            Self::build_context(detected_category, blocks, available),
            prompts::selection_schema(available),
        )
        .with_temperature(0.0);

        match complete_structured_as::<SelectionResponse>(self.backend.as_ref(), request).await {
            Ok(response) if available.iter().any(|v| v == &response.variante) => response.variante,
            Ok(response) => {
                if !response.variante.is_empty() {
                    tracing::warn!(
                        variante = %response.variante,
                        "backend proposed unavailable variant, using standard template"
                    );
                }
                String::new()
            }
            Err(err) => {
                let err = DraftingError::SelectionFailure(err.to_string());
                tracing::warn!(error = %err, "using standard template");
                String::new()
            }
        }
    }

    fn build_context(
        detected_category: Option<&str>,
        blocks: &[DemandBlock],
        available: &[String],
    ) -> String {
        let titles: Vec<&str> = blocks.iter().map(|b| b.titulo.as_str()).collect();
        format!(
            "Categoría detectada: {}\nTítulos de bloques: {}\nVariantes disponibles: {}",
            detected_category.unwrap_or("desconocida"),
            titles.join("; "),
            available.join(", ")
        )
    }
}
