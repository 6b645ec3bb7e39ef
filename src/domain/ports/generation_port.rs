use crate::domain::error::RagError;

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub max_new_tokens: usize,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            temperature: 0.3,
            top_p: 0.9,
        }
    }
}

/// External generation capability: prompt in, answer text out. May be slow;
/// callers bound it with a timeout at the orchestration layer.
#[async_trait::async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, RagError>;
}
