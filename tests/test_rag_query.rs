mod common;

use common::{CannedGenerator, FailingGenerator, FixedEmbedder, SlowGenerator};
use ragcore::application::ask::AskConfig;
use ragcore::domain::entities::document::Metadata;
use ragcore::domain::error::RagError;
use ragcore::infrastructure::embeddings::hashing::HashingProvider;
use ragcore::infrastructure::generation::extractive::ExtractiveGenerator;
use ragcore::domain::ports::generation_port::GenerationProvider;
use ragcore::RagCore;
use std::sync::Arc;
use std::time::Duration;

fn axis_embedder() -> Arc<FixedEmbedder> {
    Arc::new(
        FixedEmbedder::new(4)
            .with("doc a", vec![1.0, 0.0, 0.0, 0.0])
            .with("doc b", vec![0.0, 1.0, 0.0, 0.0])
            .with("which doc?", vec![0.9, 0.1, 0.0, 0.0]),
    )
}

async fn insert_axis_docs(engine: &RagCore) {
    engine
        .insert_documents(
            vec!["doc a".to_string(), "doc b".to_string()],
            vec![Metadata::new(), Metadata::new()],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_returns_answer_with_provenance() {
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("the answer is doc a".into())),
        AskConfig::default(),
    );
    insert_axis_docs(&engine).await;

    let result = engine.query("which doc?", 2, 150).await.unwrap();
    assert_eq!(result.answer, "the answer is doc a");
    assert_eq!(result.query, "which doc?");
    assert_eq!(result.retrieved.len(), 2);
    assert_eq!(result.retrieved[0].metadata["text"], "doc a");
}

#[tokio::test]
async fn test_empty_store_still_generates() {
    // Explicit fallback: no context, generation runs on the bare question.
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("no context needed".into())),
        AskConfig::default(),
    );

    let result = engine.query("anything", 3, 150).await.unwrap();
    assert_eq!(result.answer, "no context needed");
    assert!(result.retrieved.is_empty());
}

#[tokio::test]
async fn test_generation_failure_is_terminal_despite_good_retrieval() {
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(FailingGenerator),
        AskConfig::default(),
    );
    insert_axis_docs(&engine).await;

    // Retrieval alone succeeds with hits...
    let hits = engine.search("which doc?", 2).await.unwrap();
    assert_eq!(hits.len(), 2);

    // ...but the combined call reports the generation stage.
    let err = engine.query("which doc?", 2, 150).await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
}

#[tokio::test]
async fn test_embedding_failure_is_distinguishable() {
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("unused".into())),
        AskConfig::default(),
    );
    insert_axis_docs(&engine).await;

    // The fixture embedder has no vector for this query.
    let err = engine.query("unregistered question", 2, 150).await.unwrap_err();
    assert!(matches!(err, RagError::Embedding(_)));
}

#[tokio::test]
async fn test_empty_answer_fails_sanity_check() {
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("   \n".into())),
        AskConfig::default(),
    );
    insert_axis_docs(&engine).await;

    let err = engine.query("which doc?", 1, 150).await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
}

#[tokio::test]
async fn test_runaway_answer_fails_sanity_check() {
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("x".repeat(100_000))),
        AskConfig::default(),
    );
    insert_axis_docs(&engine).await;

    let err = engine.query("which doc?", 1, 150).await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
}

#[tokio::test]
async fn test_generation_timeout_is_generation_failure() {
    let config = AskConfig {
        timeout: Duration::from_millis(20),
        ..AskConfig::default()
    };
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(SlowGenerator {
            delay: Duration::from_millis(500),
        }),
        config,
    );
    insert_axis_docs(&engine).await;

    let err = engine.query("which doc?", 1, 150).await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
}

#[tokio::test]
async fn test_answer_limit_counts_characters_not_bytes() {
    // 100 three-byte characters: well under a 100-character limit even
    // though the byte length is 300.
    let multibyte = "\u{65e5}".repeat(100);
    let config = AskConfig {
        max_answer_chars: 100,
        ..AskConfig::default()
    };
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator(multibyte.clone())),
        config.clone(),
    );
    insert_axis_docs(&engine).await;

    let result = engine.query("which doc?", 1, 150).await.unwrap();
    assert_eq!(result.answer, multibyte);

    // One character over the limit still fails.
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("\u{65e5}".repeat(101))),
        config,
    );
    insert_axis_docs(&engine).await;
    let err = engine.query("which doc?", 1, 150).await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
}

#[tokio::test]
async fn test_extractive_generator_answers_with_top_passage() {
    let generator: Arc<dyn GenerationProvider> = Arc::new(ExtractiveGenerator);
    let engine = RagCore::in_memory(
        Arc::new(HashingProvider::new(64)),
        generator,
        AskConfig::default(),
    );
    engine
        .insert_documents(
            vec![
                "paris is the capital of france".to_string(),
                "the moon orbits the earth".to_string(),
            ],
            vec![Metadata::new(), Metadata::new()],
        )
        .await
        .unwrap();

    let result = engine
        .query("paris is the capital of france", 1, 150)
        .await
        .unwrap();
    assert_eq!(result.answer, "paris is the capital of france");
    assert_eq!(result.retrieved.len(), 1);
}

#[tokio::test]
async fn test_extractive_generator_keeps_multiline_passage_intact() {
    let embedder = Arc::new(
        FixedEmbedder::new(4)
            .with("first line\nsecond line", vec![1.0, 0.0, 0.0, 0.0])
            .with("other doc", vec![0.0, 1.0, 0.0, 0.0])
            .with("which doc?", vec![0.9, 0.1, 0.0, 0.0]),
    );
    let engine = RagCore::in_memory(embedder, Arc::new(ExtractiveGenerator), AskConfig::default());
    engine
        .insert_documents(
            vec!["first line\nsecond line".to_string(), "other doc".to_string()],
            vec![Metadata::new(), Metadata::new()],
        )
        .await
        .unwrap();

    // The whole top passage comes back, and nothing from the second one.
    let result = engine.query("which doc?", 2, 150).await.unwrap();
    assert_eq!(result.answer, "first line\nsecond line");
    assert!(!result.answer.contains("other doc"));
}

#[tokio::test]
async fn test_each_call_is_stateless() {
    let engine = RagCore::in_memory(
        axis_embedder(),
        Arc::new(CannedGenerator("same every time".into())),
        AskConfig::default(),
    );
    insert_axis_docs(&engine).await;

    let first = engine.query("which doc?", 2, 150).await.unwrap();
    let second = engine.query("which doc?", 2, 150).await.unwrap();
    assert_eq!(first.answer, second.answer);
    assert_eq!(first.retrieved.len(), second.retrieved.len());
    for (a, b) in first.retrieved.iter().zip(second.retrieved.iter()) {
        assert_eq!(a.document_id, b.document_id);
        assert_eq!(a.score, b.score);
    }
}
