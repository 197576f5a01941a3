//! Knowledge-graph context: neighbour facts for the prompt and subgraphs for the UI.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod neo4j;
pub mod provider;
pub mod types;


pub use error::GraphError;
pub use memory::InMemoryGraph;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGraph;
pub use neo4j::{Neo4jConfig, Neo4jGraph, http_base_url};
pub use provider::GraphProvider;
pub use types::{GraphEdge, GraphFact, GraphNode, GraphStats, Subgraph, truncate_chars};

/// Rows requested for the initial visualisation.
pub const INITIAL_SUBGRAPH_LIMIT: usize = 30;
/// Rows requested around a selected node.
pub const NODE_SUBGRAPH_LIMIT: usize = 20;
/// Example nodes included in graph statistics.
pub const STATS_SAMPLE_SIZE: usize = 5;
