use crate::domain::error::RagError;

#[derive(Debug, Clone, Copy)]
pub enum InputType {
    Document,
    Query,
}

/// External embedding capability: text in, fixed-length vector out.
/// Implementations must be deterministic for identical input so search
/// results are reproducible.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, RagError>;
    fn dimension(&self) -> usize;
}
