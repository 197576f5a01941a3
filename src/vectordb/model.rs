use serde::{Deserialize, Serialize};

/// One vector to store: a node id, its embedding and the metadata returned with matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, values: Vec<f32>, metadata: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            values,
            metadata,
        }
    }
}

/// Checks every record against the index dimension.
pub fn check_dimensions(records: &[VectorRecord], expected: usize) -> Result<(), super::VectorDbError> {
    match records.iter().find(|r| r.values.len() != expected) {
        Some(bad) => Err(super::VectorDbError::InvalidDimension {
            expected,
            actual: bad.values.len(),
        }),
        None => Ok(()),
    }
}
