//! Hybrid question answering: vector retrieval, graph expansion and LLM synthesis.
//!
//! Each stage degrades instead of failing the request. Embedding or vector-store errors
//! leave the answer to graph context found by name; graph errors leave it to vector
//! context; a chat failure on every model yields [`APOLOGY_MESSAGE`].

mod status;


use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::cache::CacheStats;
use crate::constants::{DEFAULT_NEIGHBORS_PER_NODE, DEFAULT_TOP_K};
use crate::embedding::{CachedEmbedder, EmbeddingProvider};
use crate::graph::GraphProvider;
use crate::llm::ChatService;
use crate::prompt::build_prompt;
use crate::retrieval::{RetrievalFilter, RetrievalMatch};
use crate::vectordb::VectorSearchProvider;

pub use status::{ContextStatus, VISTA_CONTEXT_HEADER};

pub const APOLOGY_MESSAGE: &str =
    "Sorry, I'm having trouble generating a response right now. Please try again in a moment.";

const HEALTH_PROBE_TEXT: &str = "health check";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("query must not be empty")]
    EmptyQuery,
}

/// Retrieval limits for [`HybridAssistant`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssistantConfig {
    /// Matches requested from the vector store before filtering.
    pub top_k: usize,
    pub neighbors_per_node: usize,
    pub filter: RetrievalFilter,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            neighbors_per_node: DEFAULT_NEIGHBORS_PER_NODE,
            filter: RetrievalFilter::default(),
        }
    }
}

/// Answer to one query plus the context that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub response: String,
    pub matches: Vec<RetrievalMatch>,
    /// Node ids the graph context was expanded from.
    pub graph_nodes: Vec<String>,
    pub status: ContextStatus,
    /// Model that produced `response`; `None` when every model failed.
    pub model: Option<String>,
}

/// Health of one backing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn from_result<E: std::fmt::Display>(name: &str, result: Result<(), E>) -> Self {
        Self {
            name: name.to_string(),
            healthy: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub vector_store: ComponentHealth,
    pub graph: ComponentHealth,
    pub embedder: ComponentHealth,
    pub chat_models: Vec<String>,
    pub cache: CacheStats,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.vector_store.healthy && self.graph.healthy && self.embedder.healthy
    }
}

/// Orchestrates one query across the embedding cache, vector store, graph and chat model.
#[derive(Clone)]
pub struct HybridAssistant {
    embedder: CachedEmbedder,
    vectors: Arc<dyn VectorSearchProvider>,
    graph: Arc<dyn GraphProvider>,
    chat: ChatService,
    config: AssistantConfig,
}

impl HybridAssistant {
    pub fn new(
        embedder: CachedEmbedder,
        vectors: Arc<dyn VectorSearchProvider>,
        graph: Arc<dyn GraphProvider>,
        chat: ChatService,
        config: AssistantConfig,
    ) -> Self {
        Self {
            embedder,
            vectors,
            graph,
            chat,
            config,
        }
    }

    pub fn embedder(&self) -> &CachedEmbedder {
        &self.embedder
    }

    pub fn vectors(&self) -> &Arc<dyn VectorSearchProvider> {
        &self.vectors
    }

    pub fn graph(&self) -> &Arc<dyn GraphProvider> {
        &self.graph
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Answers `query`. Only an empty query is an error.
    #[tracing::instrument(skip(self))]
    pub async fn answer(&self, query: &str) -> Result<AssistantReply, AssistantError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistantError::EmptyQuery);
        }

        let matches = self.vector_context(query).await;

        let graph_nodes: Vec<String> = if matches.is_empty() {
            self.nodes_named_in(query).await
        } else {
            matches.iter().map(|m| m.id.clone()).collect()
        };

        let facts = if graph_nodes.is_empty() {
            Vec::new()
        } else {
            match self
                .graph
                .neighbors(&graph_nodes, self.config.neighbors_per_node)
                .await
            {
                Ok(facts) => facts,
                Err(e) => {
                    warn!(error = %e, "Graph context unavailable");
                    Vec::new()
                }
            }
        };

        let status = ContextStatus::from_sources(!matches.is_empty(), !facts.is_empty());
        info!(
            matches = matches.len(),
            facts = facts.len(),
            status = %status,
            "Retrieved context"
        );

        let prompt = build_prompt(query, &matches, &facts);
        let (response, model) = match self.chat.complete(&prompt).await {
            Ok(completion) => (completion.text, Some(completion.model)),
            Err(e) => {
                error!(error = %e, "All chat models failed");
                (APOLOGY_MESSAGE.to_string(), None)
            }
        };

        Ok(AssistantReply {
            response,
            matches,
            graph_nodes,
            status,
            model,
        })
    }

    /// Filtered vector matches for `query`; empty when embedding or search fails.
    async fn vector_context(&self, query: &str) -> Vec<RetrievalMatch> {
        let vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Embedding failed; continuing without vector context");
                return Vec::new();
            }
        };

        match self.vectors.query(&vector, self.config.top_k).await {
            Ok(raw) => {
                let returned = raw.len();
                let kept = self.config.filter.apply(raw);
                info!(
                    returned,
                    kept = kept.len(),
                    threshold = self.config.filter.threshold(),
                    "Vector search"
                );
                kept
            }
            Err(e) => {
                warn!(error = %e, "Vector search failed; continuing without vector context");
                Vec::new()
            }
        }
    }

    async fn nodes_named_in(&self, query: &str) -> Vec<String> {
        match self.graph.find_nodes_by_name(query, self.config.top_k).await {
            Ok(nodes) => nodes.into_iter().map(|n| n.id).collect(),
            Err(e) => {
                warn!(error = %e, "Graph name lookup failed");
                Vec::new()
            }
        }
    }

    /// Probes every backing service.
    pub async fn health(&self) -> HealthReport {
        let (vector_result, graph_result) =
            tokio::join!(self.vectors.health_check(), self.graph.health_check());

        // Served from the cache after the first successful probe.
        let embedder_result = self.embedder.embed(HEALTH_PROBE_TEXT).await.map(|_| ());

        HealthReport {
            vector_store: ComponentHealth::from_result(self.vectors.name(), vector_result),
            graph: ComponentHealth::from_result(self.graph.name(), graph_result),
            embedder: ComponentHealth::from_result(self.embedder.name(), embedder_result),
            chat_models: self.chat.models().to_vec(),
            cache: self.embedder.cache_stats(),
        }
    }
}

impl std::fmt::Debug for HybridAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridAssistant")
            .field("embedder", &self.embedder)
            .field("vectors", &self.vectors.name())
            .field("graph", &self.graph.name())
            .field("chat", &self.chat)
            .field("config", &self.config)
            .finish()
    }
}
