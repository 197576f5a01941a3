use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ranked result from a vector-search provider.
///
/// `metadata` is opaque to the filter and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Value,
}

impl RetrievalMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            metadata: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// String metadata field, or `""` when missing or not a string.
    pub fn metadata_str(&self, field: &str) -> &str {
        self.metadata
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.metadata_str("name")
    }

    #[inline]
    pub fn node_type(&self) -> &str {
        self.metadata_str("type")
    }

    #[inline]
    pub fn city(&self) -> &str {
        self.metadata_str("city")
    }

    /// Returns `true` if `score >= threshold`.
    #[inline]
    pub fn passes(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}
