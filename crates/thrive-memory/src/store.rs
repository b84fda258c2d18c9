use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thrive_core::ThriveResult;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A text chunk stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: Uuid,
    /// The stored text chunk.
    pub text: String,
    /// Embedding of `text`.
    pub embedding: Vec<f32>,
    /// UTC insertion timestamp.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a document from text and its embedding.
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            embedding,
            created_at: Utc::now(),
        }
    }
}

/// A document together with its similarity score for a query.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Cosine similarity against the query embedding.
    pub score: f32,
}

/// Trait for namespaced vector index backends.
///
/// Namespaces keep the domain corpora (food databases, research
/// abstracts, wellness abstracts) separate within one index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert a document into a namespace.
    async fn upsert(&self, namespace: &str, document: Document) -> ThriveResult<()>;

    /// Top-k most similar documents in a namespace. An unknown namespace
    /// yields an empty result, not an error.
    async fn search(
        &self,
        namespace: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> ThriveResult<Vec<ScoredDocument>>;

    /// Number of documents in a namespace.
    async fn count(&self, namespace: &str) -> ThriveResult<usize>;
}

/// In-memory vector index using brute-force cosine similarity.
/// Suitable for the built-in corpora and tests (<100k entries).
pub struct InMemoryVectorIndex {
    namespaces: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryVectorIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, namespace: &str, document: Document) -> ThriveResult<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn search(
        &self,
        namespace: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> ThriveResult<Vec<ScoredDocument>> {
        let namespaces = self.namespaces.read().await;
        let Some(documents) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .map(|d| ScoredDocument {
                score: cosine_similarity(query_embedding, &d.embedding),
                document: d.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn count(&self, namespace: &str) -> ThriveResult<usize> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(namespace).map_or(0, Vec::len))
    }
}

/// Cosine similarity of two vectors; 0.0 for mismatched or zero-norm inputs.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_unknown_namespace_is_empty() {
        let index = InMemoryVectorIndex::new();
        let results = index.search("nowhere", &[1.0, 0.0], 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let index = InMemoryVectorIndex::new();
        index
            .upsert("pubmed", Document::new("close", vec![1.0, 0.0]))
            .await
            .unwrap();
        index
            .upsert("pubmed", Document::new("far", vec![0.0, 1.0]))
            .await
            .unwrap();

        let results = index.search("pubmed", &[0.9, 0.1], 2).await.unwrap();
        assert_eq!(results[0].document.text, "close");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let index = InMemoryVectorIndex::new();
        index
            .upsert("usda", Document::new("oats", vec![1.0]))
            .await
            .unwrap();
        assert_eq!(index.count("usda").await.unwrap(), 1);
        assert_eq!(index.count("pubmed").await.unwrap(), 0);
        let other = index.search("pubmed", &[1.0], 5).await.unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn test_cosine_similarity_zero_norm() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
