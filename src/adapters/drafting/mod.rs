//! Drafting-side adapters: draft rendering, variant lookup, party data.

mod backend_draft_generator;
mod in_memory_party_data;
mod static_variant_registry;

pub use backend_draft_generator::BackendDraftGenerator;
pub use in_memory_party_data::{format_party, InMemoryPartyData};
pub use static_variant_registry::StaticVariantRegistry;
