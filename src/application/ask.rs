use crate::application::retrieval::RetrievalPipeline;
use crate::domain::entities::document::SearchHit;
use crate::domain::error::RagError;
use crate::domain::ports::generation_port::{GenerationOptions, GenerationProvider};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AskConfig {
    /// Wall-clock bound on the generation call. Generation latency dominates
    /// the whole pipeline, so this is where callers bound it.
    pub timeout: Duration,
    /// Answers longer than this are treated as runaway output and rejected.
    pub max_answer_chars: usize,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_answer_chars: 8192,
        }
    }
}

/// A generated answer plus the hits it was conditioned on, so callers can
/// show provenance even when they only display the answer.
#[derive(Debug, Serialize)]
pub struct RagAnswer {
    pub query: String,
    pub answer: String,
    pub retrieved: Vec<SearchHit>,
}

/// Orchestrates one full RAG call: retrieve, assemble the augmented prompt,
/// generate. Stateless between calls; a failure in either stage is terminal
/// for that call and keeps its stage annotation (`Embedding` vs
/// `Generation`).
pub struct AskUseCase {
    retrieval: Arc<RetrievalPipeline>,
    generator: Arc<dyn GenerationProvider>,
    config: AskConfig,
}

impl AskUseCase {
    pub fn new(
        retrieval: Arc<RetrievalPipeline>,
        generator: Arc<dyn GenerationProvider>,
        config: AskConfig,
    ) -> Self {
        Self {
            retrieval,
            generator,
            config,
        }
    }

    pub async fn execute(
        &self,
        query: &str,
        k: usize,
        max_new_tokens: usize,
    ) -> Result<RagAnswer, RagError> {
        let hits = self.retrieval.retrieve(query, k).await?;
        let prompt = build_prompt(query, &hits);
        let options = GenerationOptions {
            max_new_tokens,
            ..GenerationOptions::default()
        };

        let answer = match tokio::time::timeout(
            self.config.timeout,
            self.generator.generate(&prompt, &options),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(RagError::Generation(format!(
                    "Generation timed out after {:?}",
                    self.config.timeout
                )));
            }
        };

        let answer = answer.trim().to_string();
        if answer.is_empty() {
            return Err(RagError::Generation("Model returned an empty answer".into()));
        }
        let answer_chars = answer.chars().count();
        if answer_chars > self.config.max_answer_chars {
            return Err(RagError::Generation(format!(
                "Answer length {} exceeds limit {}",
                answer_chars, self.config.max_answer_chars
            )));
        }

        Ok(RagAnswer {
            query: query.to_string(),
            answer,
            retrieved: hits,
        })
    }
}

/// Assemble the augmented prompt: retrieved passages in ranked order, each
/// delimited, followed by the question. With zero hits the prompt degrades
/// to the bare question so generation still runs without context.
pub fn build_prompt(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("You are a helpful AI assistant.\n\nQuestion:\n{query}\n\nAnswer:");
    }

    let context = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| format!("[{}] {}", i + 1, hit.text().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful AI assistant.\n\
         Answer the question using ONLY the context below.\n\
         If the answer is not in the context, say \"I don't know\".\n\n\
         Context:\n{context}\n\nQuestion:\n{query}\n\nAnswer:"
    )
}
