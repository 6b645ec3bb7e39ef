//! Shared test helpers: deterministic stand-ins for the embedding and
//! generation capabilities.

#![allow(dead_code)]

use ragcore::domain::entities::document::Metadata;
use ragcore::domain::error::RagError;
use ragcore::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use ragcore::domain::ports::generation_port::{GenerationOptions, GenerationProvider};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// Maps known texts to fixed vectors; errors on anything unregistered.
pub struct FixedEmbedder {
    dimension: usize,
    table: HashMap<String, Vec<f32>>,
}

impl FixedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            table: HashMap::new(),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, RagError> {
        texts
            .iter()
            .map(|t| {
                self.table
                    .get(t)
                    .cloned()
                    .ok_or_else(|| RagError::Embedding(format!("No fixture vector for {t:?}")))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Always fails, for exercising embedding-stage error propagation.
pub struct FailingEmbedder {
    pub dimension: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, RagError> {
        Err(RagError::Embedding("fixture embedder is down".into()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Claims one dimension but returns vectors of another.
pub struct WrongDimEmbedder {
    pub claimed: usize,
    pub actual: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for WrongDimEmbedder {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|_| vec![0.5; self.actual]).collect())
    }

    fn dimension(&self) -> usize {
        self.claimed
    }
}

/// Returns a fixed answer regardless of prompt.
pub struct CannedGenerator(pub String);

#[async_trait::async_trait]
impl GenerationProvider for CannedGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, RagError> {
        Ok(self.0.clone())
    }
}

/// Always fails, for exercising generation-stage error isolation.
pub struct FailingGenerator;

#[async_trait::async_trait]
impl GenerationProvider for FailingGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, RagError> {
        Err(RagError::Generation("fixture model is down".into()))
    }
}

/// Sleeps past any reasonable test timeout before answering.
pub struct SlowGenerator {
    pub delay: Duration,
}

#[async_trait::async_trait]
impl GenerationProvider for SlowGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, RagError> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }
}

pub fn meta(text: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("text".into(), json!(text));
    metadata
}
