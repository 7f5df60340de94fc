//! Variant Registry Port - template variants available per document type.

use async_trait::async_trait;

/// Port for looking up the document template variants available to a tenant.
///
/// The selector never accepts a variant outside the returned list.
#[async_trait]
pub trait VariantRegistry: Send + Sync {
    /// Lists the variant keys available for a document type
    /// (e.g. "contestacion").
    async fn available_variants(&self, document_type: &str) -> Result<Vec<String>, RegistryError>;
}

/// Variant registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Unknown document type.
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Registry backend unavailable.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
