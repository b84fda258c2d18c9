//! Retrieval and storage collaborators for the Thrive engine.
//!
//! Everything here degrades gracefully by contract: retrieval context
//! calls return an empty string when the backing index is unavailable or
//! a query matches nothing, the live research search falls back to the
//! static index before giving up, and the profile store reports success
//! as a boolean instead of raising. The reasoning loops upstream rely on
//! those guarantees to never abort a turn over a flaky collaborator.

/// Text embedding provider.
pub mod embedding;
/// Live PubMed search with layered fallback.
pub mod pubmed;
/// User profile storage.
pub mod profile;
/// Domain retrieval contexts over the vector index.
pub mod retrieval;
/// Namespaced vector index.
pub mod store;

pub use embedding::{EmbeddingProvider, HashedBagEmbedding};
pub use profile::{InMemoryProfileStore, Profile, ProfileStore, ProfileUpdate};
pub use pubmed::PubMedSearch;
pub use retrieval::{ContextLibrary, ContextSource, Domain, DomainContext};
pub use store::{Document, InMemoryVectorIndex, ScoredDocument, VectorIndex};
