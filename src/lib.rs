pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::ask::{AskConfig, AskUseCase, RagAnswer};
use crate::application::retrieval::RetrievalPipeline;
use crate::domain::entities::document::{Metadata, SearchHit, StoreStats};
use crate::domain::error::RagError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::generation_port::GenerationProvider;
use crate::infrastructure::embeddings::hashing::HashingProvider;
use crate::infrastructure::embeddings::huggingface::HuggingFaceProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::generation::extractive::ExtractiveGenerator;
use crate::infrastructure::generation::huggingface::HuggingFaceGenerator;
use crate::infrastructure::memory::vector_store::InMemoryVectorStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct RagCore {
    store: Arc<InMemoryVectorStore>,
    retrieval: Arc<RetrievalPipeline>,
    ask_uc: AskUseCase,
}

impl RagCore {
    /// Build an engine from environment configuration, restoring the vector
    /// store from `db_path` when a snapshot exists there.
    pub fn new(db_path: &str) -> Result<Self, RagError> {
        let provider = std::env::var("RAGCORE_EMBEDDING_PROVIDER").unwrap_or_else(|_| "hashing".into());
        let api_key = std::env::var("RAGCORE_EMBEDDING_API_KEY").unwrap_or_default();
        let model = std::env::var("RAGCORE_EMBEDDING_MODEL").ok();

        let embedder: Arc<dyn EmbeddingProvider> = match provider.as_str() {
            "openai" => Arc::new(OpenAiProvider::new(api_key, model)),
            "huggingface" => Arc::new(HuggingFaceProvider::new(api_key, model)),
            _ => Arc::new(HashingProvider::default()),
        };

        let gen_provider = std::env::var("RAGCORE_GENERATION_PROVIDER").unwrap_or_else(|_| "extractive".into());
        let gen_key = std::env::var("RAGCORE_GENERATION_API_KEY").unwrap_or_default();
        let gen_model = std::env::var("RAGCORE_GENERATION_MODEL").ok();

        let generator: Arc<dyn GenerationProvider> = match gen_provider.as_str() {
            "huggingface" => Arc::new(HuggingFaceGenerator::new(gen_key, gen_model)),
            _ => Arc::new(ExtractiveGenerator),
        };

        let mut config = AskConfig::default();
        if let Some(secs) = std::env::var("RAGCORE_GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }

        Self::with_providers(db_path, embedder, generator, config)
    }

    /// Restore the store from `db_path` if a snapshot exists there,
    /// otherwise start empty at the embedder's dimension.
    pub fn with_providers(
        db_path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        config: AskConfig,
    ) -> Result<Self, RagError> {
        let store = if Path::new(db_path).exists() {
            let store = InMemoryVectorStore::restore_from_file(db_path)?;
            if store.dimension() != embedder.dimension() {
                eprintln!(
                    "⚠️  WARNING: Snapshot has dimension {} but current embedding provider reports {}. Queries will fail until documents are re-embedded.",
                    store.dimension(),
                    embedder.dimension()
                );
            }
            store
        } else {
            InMemoryVectorStore::new(embedder.dimension())
        };

        Ok(Self::assemble(Arc::new(store), embedder, generator, config))
    }

    /// Fully in-memory engine with explicit capabilities; no snapshot is
    /// read or written unless the caller asks.
    pub fn in_memory(
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        config: AskConfig,
    ) -> Self {
        let store = Arc::new(InMemoryVectorStore::new(embedder.dimension()));
        Self::assemble(store, embedder, generator, config)
    }

    fn assemble(
        store: Arc<InMemoryVectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        config: AskConfig,
    ) -> Self {
        let retrieval = Arc::new(RetrievalPipeline::new(store.clone(), embedder));
        Self {
            store,
            retrieval: retrieval.clone(),
            ask_uc: AskUseCase::new(retrieval, generator, config),
        }
    }

    // Delegating methods

    pub async fn insert_document(&self, text: String, metadata: Metadata) -> Result<String, RagError> {
        let ids = self.retrieval.insert_documents(vec![text], vec![metadata]).await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("Insert produced no document id".into()))
    }

    pub async fn insert_documents(
        &self,
        texts: Vec<String>,
        metadatas: Vec<Metadata>,
    ) -> Result<Vec<String>, RagError> {
        self.retrieval.insert_documents(texts, metadatas).await
    }

    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RagError> {
        self.retrieval.retrieve(query, k).await
    }

    pub async fn query(
        &self,
        question: &str,
        k: usize,
        max_new_tokens: usize,
    ) -> Result<RagAnswer, RagError> {
        self.ask_uc.execute(question, k, max_new_tokens).await
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn save_db(&self, path: &str) -> Result<(), RagError> {
        self.store.save_to_file(path)
    }

    /// Direct handle to the underlying store, for callers that work at the
    /// vector level rather than the text level.
    pub fn store(&self) -> &InMemoryVectorStore {
        &self.store
    }
}
