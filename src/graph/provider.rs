use async_trait::async_trait;

use super::error::GraphError;
use super::types::{GraphFact, GraphNode, GraphStats, Subgraph};

#[async_trait]
/// Read-only access to the travel knowledge graph.
pub trait GraphProvider: Send + Sync {
    /// Relationships of each node in `node_ids`, at most `limit_per_node` per node.
    ///
    /// Failures for an individual node are logged and skipped; an error is returned only
    /// when the backend is unreachable.
    async fn neighbors(
        &self,
        node_ids: &[String],
        limit_per_node: usize,
    ) -> Result<Vec<GraphFact>, GraphError>;

    /// Nodes whose name occurs in `text` (case-insensitive), at most `limit`.
    async fn find_nodes_by_name(&self, text: &str, limit: usize)
    -> Result<Vec<GraphNode>, GraphError>;

    /// Edges around `center`, or an arbitrary sample of the graph when `None`.
    async fn subgraph(&self, center: Option<&str>, limit: usize) -> Result<Subgraph, GraphError>;

    /// Node and relationship counts with `sample` example nodes.
    async fn stats(&self, sample: usize) -> Result<GraphStats, GraphError>;

    async fn health_check(&self) -> Result<(), GraphError>;

    fn name(&self) -> &str;
}
