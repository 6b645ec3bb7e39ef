use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Length mismatch: {items} items but {metadatas} metadata entries")]
    LengthMismatch { items: usize, metadatas: usize },

    #[error("Invalid k: must be at least 1")]
    InvalidK,

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RagError {
    fn from(e: serde_json::Error) -> Self {
        RagError::Serialization(e.to_string())
    }
}
