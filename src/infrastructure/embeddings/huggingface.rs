use crate::domain::error::RagError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use reqwest::Client;
use serde::Serialize;

/// Hugging Face Inference API feature-extraction endpoint. Defaults to the
/// BGE family of retrieval models.
pub struct HuggingFaceProvider {
    client: Client,
    api_token: String,
    model: String,
}

#[derive(Serialize)]
struct FeatureExtractionRequest {
    inputs: Vec<String>,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

impl HuggingFaceProvider {
    pub fn new(api_token: String, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_token,
            model: model.unwrap_or_else(|| "BAAI/bge-small-en-v1.5".to_string()),
        }
    }

    fn model_dimension(model: &str) -> usize {
        match model {
            "BAAI/bge-small-en-v1.5" => 384,
            "TaylorAI/bge-micro" => 384,
            "BAAI/bge-base-en-v1.5" => 768,
            "BAAI/bge-large-en-v1.5" => 1024,
            _ => 384,
        }
    }

    /// BGE models expect a retrieval instruction prepended to queries but
    /// not to documents.
    fn prepare(&self, texts: &[String], input_type: InputType) -> Vec<String> {
        match input_type {
            InputType::Query if self.model.contains("bge") => texts
                .iter()
                .map(|t| format!("Represent this sentence for searching relevant passages: {t}"))
                .collect(),
            _ => texts.to_vec(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HuggingFaceProvider {
    async fn embed(&self, texts: &[String], input_type: InputType) -> Result<Vec<Vec<f32>>, RagError> {
        let url = format!(
            "https://api-inference.huggingface.co/pipeline/feature-extraction/{}",
            self.model
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&FeatureExtractionRequest {
                inputs: self.prepare(texts, input_type),
                options: RequestOptions { wait_for_model: true },
            })
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("HF API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!("HF API {status}: {body}")));
        }

        let vectors: Vec<Vec<f32>> = resp
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Parse error: {e}")))?;
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        Self::model_dimension(&self.model)
    }
}
