use serde::{Deserialize, Serialize};

/// One relationship from a retrieved node to a neighbour, used as prompt context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFact {
    pub source: String,
    pub rel: String,
    pub target_id: String,
    pub target_name: String,
    #[serde(default)]
    pub target_type: String,
    /// Neighbour description, truncated for prompt use.
    #[serde(default)]
    pub target_desc: String,
}

/// Visualisation node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

impl GraphNode {
    /// Falls back to the id for a missing name and `Unknown` for a missing type.
    pub fn new(id: impl Into<String>, name: Option<String>, node_type: Option<String>) -> Self {
        let id = id.into();
        Self {
            label: name.filter(|n| !n.is_empty()).unwrap_or_else(|| id.clone()),
            node_type: node_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            id,
        }
    }
}

/// Visualisation edge labelled with the relationship type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Nodes and edges for the graph view. Nodes are unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Subgraph {
    /// Adds one `(n)-[r]-(m)` row, deduplicating nodes and keeping first-seen order.
    pub fn push_row(&mut self, n: GraphNode, rel: impl Into<String>, m: GraphNode) {
        self.edges.push(GraphEdge {
            from: n.id.clone(),
            to: m.id.clone(),
            label: rel.into(),
        });
        for node in [n, m] {
            if !self.nodes.iter().any(|existing| existing.id == node.id) {
                self.nodes.push(node);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Counts and a small sample of node properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: u64,
    pub relationship_count: u64,
    pub sample_nodes: Vec<serde_json::Value>,
}

/// Truncates to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
