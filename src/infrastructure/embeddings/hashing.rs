use crate::domain::error::RagError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic local embedder: feature-hashes word tokens into a fixed
/// number of buckets and L2-normalizes the counts. There is no semantic
/// model behind it, but identical texts always map to identical vectors,
/// which keeps the full pipeline usable offline and in tests. Default
/// provider when no API is configured.
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0.0_f64; self.dimension];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            counts[bucket] += 1.0;
        }
        let norm = counts.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in counts.iter_mut() {
                *x /= norm;
            }
        }
        counts.into_iter().map(|x| x as f32).collect()
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        // Matches the 384-dim BGE models the hosted providers default to,
        // so switching providers does not change the store dimension.
        Self::new(384)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
