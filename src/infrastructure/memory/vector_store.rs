use crate::domain::entities::document::{Document, Metadata, SearchHit, StoreStats};
use crate::domain::error::RagError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Flat in-memory vector index. Every search is an exact O(n·D) scan with
/// cosine similarity; there is deliberately no index structure on top —
/// at low-thousands document counts the scan is fast enough and the
/// simplicity pays for itself.
///
/// The dimension is fixed at construction and never changes. Searches share
/// a read lock; inserts and loads take the write lock, so a reader never
/// observes a half-applied mutation.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    dimension: usize,
    documents: RwLock<Vec<Document>>,
}

/// Self-describing persisted form of the full store state.
#[derive(Serialize, Deserialize)]
struct StoreSnapshot {
    dimension: usize,
    documents: Vec<Document>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Rebuild a store from a snapshot produced by [`save`](Self::save).
    pub fn restore(blob: &str) -> Result<Self, RagError> {
        let snapshot: StoreSnapshot = serde_json::from_str(blob)?;
        Self::validate_snapshot(&snapshot)?;
        Ok(Self {
            dimension: snapshot.dimension,
            documents: RwLock::new(snapshot.documents),
        })
    }

    pub fn restore_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RagError> {
        let blob = std::fs::read_to_string(path)
            .map_err(|e| RagError::Serialization(format!("Failed to read snapshot: {e}")))?;
        Self::restore(&blob)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total_documents: self.read().len(),
            dimension: self.dimension,
        }
    }

    /// Append one document, returning its freshly assigned id.
    pub fn insert(&self, vector: Vec<f32>, metadata: Metadata) -> Result<String, RagError> {
        self.check_dimension(&vector)?;
        let doc = Document::new(vector, metadata);
        let id = doc.id.clone();
        self.write().push(doc);
        Ok(id)
    }

    /// Append a batch of documents. All inputs are validated before any
    /// mutation, so a bad entry anywhere in the batch inserts nothing.
    pub fn batch_insert(
        &self,
        vectors: Vec<Vec<f32>>,
        metadatas: Vec<Metadata>,
    ) -> Result<Vec<String>, RagError> {
        if vectors.len() != metadatas.len() {
            return Err(RagError::LengthMismatch {
                items: vectors.len(),
                metadatas: metadatas.len(),
            });
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }

        let mut docs = self.write();
        let mut ids = Vec::with_capacity(vectors.len());
        for (vector, metadata) in vectors.into_iter().zip(metadatas) {
            let doc = Document::new(vector, metadata);
            ids.push(doc.id.clone());
            docs.push(doc);
        }
        Ok(ids)
    }

    /// Exact top-k search by cosine similarity. Returns at most
    /// `min(k, total_documents)` hits in descending score order; equal scores
    /// keep insertion order (stable sort). Stored vectors are scored at raw
    /// precision — normalization happens here, never in place.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        self.check_dimension(query)?;
        if k == 0 {
            return Err(RagError::InvalidK);
        }

        let docs = self.read();
        let mut hits: Vec<SearchHit> = docs
            .iter()
            .map(|doc| SearchHit {
                document_id: doc.id.clone(),
                score: cosine_similarity(query, &doc.vector),
                metadata: doc.metadata.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }

    /// Serialize the complete store state. The write path takes the same
    /// lock, so the snapshot is always consistent.
    pub fn save(&self) -> Result<String, RagError> {
        let docs = self.read();
        let snapshot = StoreSnapshot {
            dimension: self.dimension,
            documents: docs.clone(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RagError> {
        let blob = self.save()?;
        std::fs::write(path, blob)
            .map_err(|e| RagError::Serialization(format!("Failed to write snapshot: {e}")))
    }

    /// Replace the full document set from a snapshot. The snapshot must
    /// carry this store's dimension; validation happens before any state is
    /// touched, so a bad blob leaves the store unchanged.
    pub fn load(&self, blob: &str) -> Result<(), RagError> {
        let snapshot: StoreSnapshot = serde_json::from_str(blob)?;
        if snapshot.dimension != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: snapshot.dimension,
            });
        }
        Self::validate_snapshot(&snapshot)?;
        *self.write() = snapshot.documents;
        Ok(())
    }

    fn validate_snapshot(snapshot: &StoreSnapshot) -> Result<(), RagError> {
        for doc in &snapshot.documents {
            if doc.vector.len() != snapshot.dimension {
                return Err(RagError::Serialization(format!(
                    "Document {} has dimension {}, snapshot declares {}",
                    doc.id,
                    doc.vector.len(),
                    snapshot.dimension
                )));
            }
        }
        Ok(())
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), RagError> {
        if vector.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Document>> {
        self.documents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Document>> {
        self.documents.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cosine similarity with f64 accumulation. Equivalent to normalizing both
/// vectors to unit L2 norm and taking the dot product; a zero-norm vector
/// scores 0.0 against anything.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
