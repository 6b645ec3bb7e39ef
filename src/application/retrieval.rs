use crate::domain::entities::document::{Metadata, SearchHit};
use crate::domain::error::RagError;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::infrastructure::memory::vector_store::InMemoryVectorStore;
use serde_json::Value;
use std::sync::Arc;

/// Turns raw text into ranked document hits: embed the query, delegate to
/// the vector store.
pub struct RetrievalPipeline {
    store: Arc<InMemoryVectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl RetrievalPipeline {
    pub fn new(store: Arc<InMemoryVectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RagError> {
        if k == 0 {
            return Err(RagError::InvalidK);
        }
        // An empty store is a valid state, not a failure; skip the
        // embedding call entirely.
        if self.store.is_empty() {
            return Ok(Vec::new());
        }
        let vector = self.embed_query(query).await?;
        self.store.search(&vector, k)
    }

    /// Embed each text, then hand the whole batch to the store. Every
    /// embedding call happens before any insert, so a provider failure
    /// partway through leaves the store untouched.
    pub async fn insert_documents(
        &self,
        texts: Vec<String>,
        mut metadatas: Vec<Metadata>,
    ) -> Result<Vec<String>, RagError> {
        if texts.len() != metadatas.len() {
            return Err(RagError::LengthMismatch {
                items: texts.len(),
                metadatas: metadatas.len(),
            });
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(32) {
            let embedded = self.embedder.embed(chunk, InputType::Document).await?;
            if embedded.len() != chunk.len() {
                return Err(RagError::Embedding(format!(
                    "Provider returned {} vectors for {} texts",
                    embedded.len(),
                    chunk.len()
                )));
            }
            vectors.extend(embedded);
        }

        for (text, metadata) in texts.iter().zip(metadatas.iter_mut()) {
            metadata
                .entry("text".to_string())
                .or_insert_with(|| Value::String(text.clone()));
        }

        self.store.batch_insert(vectors, metadatas)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RagError> {
        let mut vectors = self
            .embedder
            .embed(&[query.to_string()], InputType::Query)
            .await?;
        if vectors.len() != 1 {
            return Err(RagError::Embedding(format!(
                "Provider returned {} vectors for one query",
                vectors.len()
            )));
        }
        let vector = vectors.remove(0);
        // A wrong-length query vector is a provider fault, reported as such
        // so callers can tell it apart from a store-level mismatch.
        if vector.len() != self.store.dimension() {
            return Err(RagError::Embedding(format!(
                "Provider returned dimension {}, store expects {}",
                vector.len(),
                self.store.dimension()
            )));
        }
        Ok(vector)
    }
}
