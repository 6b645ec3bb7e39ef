use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key/value metadata attached to a document. The store treats it as
/// opaque; by convention the source text lives under the `"text"` key.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(vector: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            vector,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Source text stored under the `"text"` metadata key, if present.
    pub fn text(&self) -> Option<&str> {
        self.metadata.get("text").and_then(|v| v.as_str())
    }
}

/// One ranked search result. Computed per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: String,
    pub score: f64,
    pub metadata: Metadata,
}

impl SearchHit {
    pub fn text(&self) -> Option<&str> {
        self.metadata.get("text").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_documents: usize,
    pub dimension: usize,
}
