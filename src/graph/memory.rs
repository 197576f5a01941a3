//! Adjacency-list graph for offline runs and tests, built from the travel dataset.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::error::GraphError;
use super::provider::GraphProvider;
use super::types::{GraphFact, GraphNode, GraphStats, Subgraph, truncate_chars};
use crate::constants::GRAPH_DESCRIPTION_MAX_CHARS;
use crate::ingest::TravelNode;

#[derive(Debug, Clone)]
struct NodeEntry {
    name: String,
    node_type: String,
    description: String,
    properties: Value,
}

#[derive(Debug, Clone)]
struct Edge {
    from: String,
    rel: String,
    to: String,
}

/// In-memory labelled property graph. Relationships are matched in both directions, and
/// edges whose endpoints are unknown are ignored.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGraph {
    order: Vec<String>,
    nodes: HashMap<String, NodeEntry>,
    edges: Vec<Edge>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from dataset nodes and their `connections`.
    pub fn from_dataset(dataset: &[TravelNode]) -> Self {
        let mut graph = Self::new();
        for node in dataset {
            graph.add_node(
                &node.id,
                node.name.as_deref().unwrap_or_default(),
                node.node_type.as_deref().unwrap_or_default(),
                node.description.as_deref().unwrap_or_default(),
                node.properties(),
            );
        }
        for node in dataset {
            for conn in &node.connections {
                graph.add_edge(&node.id, &conn.relation, &conn.target);
            }
        }
        graph
    }

    /// Inserts or replaces a node.
    pub fn add_node(
        &mut self,
        id: &str,
        name: &str,
        node_type: &str,
        description: &str,
        properties: Value,
    ) {
        if !self.nodes.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.nodes.insert(
            id.to_string(),
            NodeEntry {
                name: name.to_string(),
                node_type: node_type.to_string(),
                description: description.to_string(),
                properties,
            },
        );
    }

    pub fn add_edge(&mut self, from: &str, rel: &str, to: &str) {
        self.edges.push(Edge {
            from: from.to_string(),
            rel: rel.to_string(),
            to: to.to_string(),
        });
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges whose endpoints both exist.
    fn live_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| self.nodes.contains_key(&e.from) && self.nodes.contains_key(&e.to))
    }

    fn graph_node(&self, id: &str) -> GraphNode {
        let entry = self.nodes.get(id);
        GraphNode::new(
            id,
            entry.map(|e| e.name.clone()),
            entry.map(|e| e.node_type.clone()),
        )
    }

    /// `(neighbour, rel)` pairs of `id`, in edge order.
    fn adjacent<'a>(&'a self, id: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.live_edges().filter_map(move |e| {
            if e.from == id {
                Some((e.to.as_str(), e.rel.as_str()))
            } else if e.to == id {
                Some((e.from.as_str(), e.rel.as_str()))
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl GraphProvider for InMemoryGraph {
    async fn neighbors(
        &self,
        node_ids: &[String],
        limit_per_node: usize,
    ) -> Result<Vec<GraphFact>, GraphError> {
        let mut facts = Vec::new();
        for nid in node_ids {
            for (other, rel) in self.adjacent(nid).take(limit_per_node) {
                let Some(entry) = self.nodes.get(other) else {
                    continue;
                };
                facts.push(GraphFact {
                    source: nid.clone(),
                    rel: rel.to_string(),
                    target_id: other.to_string(),
                    target_name: entry.name.clone(),
                    target_type: entry.node_type.clone(),
                    target_desc: truncate_chars(&entry.description, GRAPH_DESCRIPTION_MAX_CHARS),
                });
            }
        }
        Ok(facts)
    }

    async fn find_nodes_by_name(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<GraphNode>, GraphError> {
        let haystack = text.to_lowercase();
        Ok(self
            .order
            .iter()
            .filter(|id| {
                self.nodes.get(*id).is_some_and(|e| {
                    e.name.chars().count() >= 3 && haystack.contains(&e.name.to_lowercase())
                })
            })
            .take(limit)
            .map(|id| self.graph_node(id))
            .collect())
    }

    async fn subgraph(&self, center: Option<&str>, limit: usize) -> Result<Subgraph, GraphError> {
        let mut subgraph = Subgraph::default();

        match center {
            Some(id) => {
                for (other, rel) in self.adjacent(id).take(limit) {
                    subgraph.push_row(self.graph_node(id), rel, self.graph_node(other));
                }
            }
            None => {
                for edge in self.live_edges().take(limit) {
                    subgraph.push_row(
                        self.graph_node(&edge.from),
                        edge.rel.clone(),
                        self.graph_node(&edge.to),
                    );
                }
            }
        }

        Ok(subgraph)
    }

    async fn stats(&self, sample: usize) -> Result<GraphStats, GraphError> {
        Ok(GraphStats {
            node_count: self.nodes.len() as u64,
            relationship_count: self.live_edges().count() as u64,
            sample_nodes: self
                .order
                .iter()
                .take(sample)
                .filter_map(|id| self.nodes.get(id).map(|e| e.properties.clone()))
                .collect(),
        })
    }

    async fn health_check(&self) -> Result<(), GraphError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
