//! Ports: interfaces to external collaborators.
//!
//! The generative backend is the sole source of non-determinism in the
//! crate; everything behind these traits can be replaced by in-memory
//! implementations in tests.

mod draft_generator;
mod generative_backend;
mod party_data;
mod variant_registry;

pub use draft_generator::{Draft, DraftError, DraftGenerator, DraftRequest};
pub use generative_backend::{
    complete_structured_as, BackendError, GenerativeBackend, ProviderInfo, StructuredRequest,
    TextRequest,
};
pub use party_data::{PartyData, PartyDataError, PartyDataProvider, PartyInfo};
pub use variant_registry::{RegistryError, VariantRegistry};
