use async_trait::async_trait;
use std::collections::HashMap;
use thrive_core::{ThriveError, ThriveResult};

/// Trait for computing text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Compute the embedding vector for a single text.
    async fn embed(&self, text: &str) -> ThriveResult<Vec<f32>>;

    /// Dimension of the vectors produced by this provider.
    fn dimension(&self) -> usize;
}

/// Local term-frequency hashing embedding — no external API needed.
///
/// Good enough for topical matching over the small built-in corpora;
/// swap in a hosted embedding provider behind the same trait for real
/// deployments.
pub struct HashedBagEmbedding {
    dimension: usize,
}

impl HashedBagEmbedding {
    /// Create a provider with the given output dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashedBagEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for HashedBagEmbedding {
    async fn embed(&self, text: &str) -> ThriveResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(ThriveError::Memory("cannot embed empty text".to_string()));
        }

        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1)
            .collect();

        let mut vector = vec![0.0f32; self.dimension];
        if words.is_empty() {
            return Ok(vector);
        }

        let mut freq: HashMap<&str, f32> = HashMap::new();
        for word in &words {
            *freq.entry(word).or_insert(0.0) += 1.0;
        }

        let total = words.len() as f32;
        for (word, count) in &freq {
            let tf = count / total;
            // Two hash positions per word for better distribution.
            let h1 = fnv1a(word.as_bytes()) as usize;
            let h2 = fnv1a(&[word.as_bytes(), &[0x1f]].concat()) as usize;
            vector[h1 % self.dimension] += tf;
            vector[h2 % self.dimension] += tf * 0.6;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// FNV-1a hash.
fn fnv1a(data: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in data {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}
