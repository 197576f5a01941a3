use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::GraphError;
use super::memory::InMemoryGraph;
use super::provider::GraphProvider;
use super::types::{GraphFact, GraphNode, GraphStats, Subgraph};

/// [`InMemoryGraph`] with a failure switch and a neighbour-call counter.
#[derive(Debug)]
pub struct MockGraph {
    inner: InMemoryGraph,
    failing: AtomicBool,
    neighbor_calls: AtomicUsize,
}

impl MockGraph {
    pub fn new(inner: InMemoryGraph) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            neighbor_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn neighbor_calls(&self) -> usize {
        self.neighbor_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), GraphError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GraphError::ConnectionFailed {
                url: "mock://graph".to_string(),
                message: "graph unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GraphProvider for MockGraph {
    async fn neighbors(
        &self,
        node_ids: &[String],
        limit_per_node: usize,
    ) -> Result<Vec<GraphFact>, GraphError> {
        self.neighbor_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.neighbors(node_ids, limit_per_node).await
    }

    async fn find_nodes_by_name(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<GraphNode>, GraphError> {
        self.check()?;
        self.inner.find_nodes_by_name(text, limit).await
    }

    async fn subgraph(&self, center: Option<&str>, limit: usize) -> Result<Subgraph, GraphError> {
        self.check()?;
        self.inner.subgraph(center, limit).await
    }

    async fn stats(&self, sample: usize) -> Result<GraphStats, GraphError> {
        self.check()?;
        self.inner.stats(sample).await
    }

    async fn health_check(&self) -> Result<(), GraphError> {
        self.check()
    }

    fn name(&self) -> &str {
        "mock"
    }
}
