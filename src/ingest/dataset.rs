use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::IngestError;

/// A relationship declared on a dataset node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub relation: String,
    pub target: String,
}

/// One entity of the travel dataset (city, attraction, hotel, activity ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub semantic_text: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Any other attributes (best time to visit, price range ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TravelNode {
    /// Node properties as stored in the graph: every field except `connections`.
    pub fn properties(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("connections");
            map.retain(|_, v| !v.is_null());
        }
        value
    }
}

/// Reads a JSON array of [`TravelNode`]s.
pub fn load_dataset(path: &Path) -> Result<Vec<TravelNode>, IngestError> {
    let raw = std::fs::read_to_string(path).map_err(|e| IngestError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|e| IngestError::ParseFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
