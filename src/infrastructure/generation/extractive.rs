use crate::domain::error::RagError;
use crate::domain::ports::generation_port::{GenerationOptions, GenerationProvider};

/// Offline fallback generator: no model call, just echoes the top-ranked
/// context passage. Understands the prompt layout produced by
/// `application::ask::build_prompt` (passages delimited `[1] …`). Default
/// generator when no API is configured; also the deterministic stand-in
/// for tests.
pub struct ExtractiveGenerator;

#[async_trait::async_trait]
impl GenerationProvider for ExtractiveGenerator {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String, RagError> {
        // The top passage runs from the "[1] " marker to the next passage
        // marker or the question section; passages may span lines.
        let passage = prompt
            .split_once("\n[1] ")
            .map(|(_, rest)| {
                let end = rest
                    .find("\n[2] ")
                    .or_else(|| rest.find("\n\nQuestion:"))
                    .unwrap_or(rest.len());
                rest[..end].trim()
            })
            .unwrap_or("");

        if passage.is_empty() {
            Ok("No generation model is configured and no matching context was found.".to_string())
        } else {
            Ok(passage.to_string())
        }
    }
}
