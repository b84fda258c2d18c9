use crate::embedding::EmbeddingProvider;
use crate::store::{Document, VectorIndex};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Chunks retrieved per namespace. Fewer chunks keep prompts small.
const MAX_CHUNKS: usize = 3;

/// A retrieval-context collaborator as the specialists see it.
///
/// Contract: returns an empty string when the backing index is
/// unavailable or the query matches nothing. Never raises.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Retrieve context text for a query.
    async fn get_context(&self, query: &str) -> String;
}

/// The retrieval domain a specialist draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Food databases (Open Food Facts + USDA namespaces).
    Nutrition,
    /// Research abstracts.
    Research,
    /// Wellness research abstracts.
    Wellness,
}

/// Retrieval over the namespaced vector index: one embedding per query,
/// then one similarity search per namespace of the requested domain.
pub struct ContextLibrary {
    embedding: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl ContextLibrary {
    /// Create a library over the given embedding provider and index.
    pub fn new(embedding: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedding, index }
    }

    /// Retrieve context for a domain. Empty string on any failure.
    pub async fn get_context(&self, domain: Domain, query: &str) -> String {
        let vector = match self.embedding.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Context embedding failed");
                return String::new();
            }
        };

        let parts: Vec<String> = match domain {
            Domain::Nutrition => {
                // One embedding, two parallel namespace queries.
                let (off, usda) = tokio::join!(
                    self.namespace_texts("openfoodfacts", &vector),
                    self.namespace_texts("usda", &vector),
                );
                [off, usda].into_iter().flatten().collect()
            }
            Domain::Research => self
                .namespace_texts("pubmed", &vector)
                .await
                .into_iter()
                .collect(),
            Domain::Wellness => self
                .namespace_texts("wellness", &vector)
                .await
                .into_iter()
                .collect(),
        };

        parts.join("\n\n---\n\n")
    }

    /// Seed a namespace with text chunks (demo corpora and tests).
    pub async fn seed(&self, namespace: &str, texts: &[&str]) {
        for text in texts {
            match self.embedding.embed(text).await {
                Ok(embedding) => {
                    if let Err(e) = self.index.upsert(namespace, Document::new(*text, embedding)).await
                    {
                        warn!(namespace, error = %e, "Corpus seed insert failed");
                    }
                }
                Err(e) => warn!(namespace, error = %e, "Corpus seed embedding failed"),
            }
        }
    }

    /// Joined text of the top matches in one namespace; None when empty.
    async fn namespace_texts(&self, namespace: &str, vector: &[f32]) -> Option<String> {
        match self.index.search(namespace, vector, MAX_CHUNKS).await {
            Ok(hits) if !hits.is_empty() => Some(
                hits.into_iter()
                    .map(|h| h.document.text)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Ok(_) => None,
            Err(e) => {
                warn!(namespace, error = %e, "Vector index query failed");
                None
            }
        }
    }
}

/// Adapter fixing a [`ContextLibrary`] to one [`Domain`], so each
/// specialist depends on the narrow [`ContextSource`] seam.
pub struct DomainContext {
    library: Arc<ContextLibrary>,
    domain: Domain,
}

impl DomainContext {
    /// Bind a library to a domain.
    pub fn new(library: Arc<ContextLibrary>, domain: Domain) -> Self {
        Self { library, domain }
    }
}

#[async_trait]
impl ContextSource for DomainContext {
    async fn get_context(&self, query: &str) -> String {
        self.library.get_context(self.domain, query).await
    }
}
