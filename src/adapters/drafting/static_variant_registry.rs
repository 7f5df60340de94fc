//! Static Variant Registry - fixed in-memory variant lists per document type.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::ports::{RegistryError, VariantRegistry};

/// In-memory [`VariantRegistry`] built at construction time.
#[derive(Default)]
pub struct StaticVariantRegistry {
    variants: HashMap<String, Vec<String>>,
}

impl StaticVariantRegistry {
    /// Creates a registry with one document type.
    pub fn new(document_type: impl Into<String>, variants: Vec<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(document_type.into(), variants);
        Self { variants: map }
    }

    /// Adds another document type.
    pub fn with_document_type(
        mut self,
        document_type: impl Into<String>,
        variants: Vec<String>,
    ) -> Self {
        self.variants.insert(document_type.into(), variants);
        self
    }
}

#[async_trait]
impl VariantRegistry for StaticVariantRegistry {
    async fn available_variants(&self, document_type: &str) -> Result<Vec<String>, RegistryError> {
        self.variants
            .get(document_type)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownDocumentType(document_type.to_string()))
    }
}
