use crate::domain::error::RagError;
use crate::domain::ports::generation_port::{GenerationOptions, GenerationProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Hugging Face Inference API text-generation endpoint.
pub struct HuggingFaceGenerator {
    client: Client,
    api_token: String,
    model: String,
}

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: usize,
    temperature: f64,
    top_p: f64,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct GenerationResponse {
    generated_text: String,
}

impl HuggingFaceGenerator {
    pub fn new(api_token: String, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_token,
            model: model.unwrap_or_else(|| "google/flan-t5-base".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl GenerationProvider for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, RagError> {
        let url = format!("https://api-inference.huggingface.co/models/{}", self.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&GenerationRequest {
                inputs: prompt,
                parameters: GenerationParameters {
                    max_new_tokens: options.max_new_tokens,
                    temperature: options.temperature,
                    top_p: options.top_p,
                    return_full_text: false,
                },
            })
            .send()
            .await
            .map_err(|e| RagError::Generation(format!("HF API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!("HF API {status}: {body}")));
        }

        let result: Vec<GenerationResponse> = resp
            .json()
            .await
            .map_err(|e| RagError::Generation(format!("Parse error: {e}")))?;

        result
            .into_iter()
            .next()
            .map(|r| r.generated_text)
            .ok_or_else(|| RagError::Generation("HF API returned no generations".into()))
    }
}
