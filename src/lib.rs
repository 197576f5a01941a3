//! Vista library crate (used by the `vista` binary and integration tests).
//!
//! A hybrid retrieval-augmented travel assistant: a query is embedded through a bounded
//! LRU [`EmbeddingCache`], matched against a vector index, filtered by similarity
//! threshold, expanded with knowledge-graph neighbours and answered by a chat model.
//!
//! # Public API Surface
//!
//! ## Core
//! - [`EmbeddingCache`], [`EmbeddingCacheHandle`], [`CacheStats`] - embedding cache
//! - [`RetrievalFilter`], [`RetrievalMatch`] - threshold filtering of vector matches
//! - [`HybridAssistant`], [`ContextStatus`] - query orchestration
//!
//! ## Providers
//! - [`EmbeddingProvider`]: [`HttpEmbedder`], [`HashingEmbedder`], [`CachedEmbedder`]
//! - [`VectorSearchProvider`]: [`PineconeStore`], [`QdrantStore`], [`InMemoryVectorStore`]
//! - [`GraphProvider`]: [`Neo4jGraph`], [`InMemoryGraph`]
//! - [`ChatProvider`]: [`GenaiChatProvider`], [`EchoChatProvider`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod assistant;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod graph;
pub mod hashing;
pub mod ingest;
pub mod llm;
pub mod prompt;
pub mod retrieval;
pub mod vectordb;

pub use assistant::{
    APOLOGY_MESSAGE, AssistantConfig, AssistantError, AssistantReply, ContextStatus,
    HealthReport, HybridAssistant, VISTA_CONTEXT_HEADER,
};
pub use cache::{CacheError, CacheStats, EmbeddingCache, EmbeddingCacheHandle};
pub use config::{Config, ConfigError, VectorBackend};
pub use embedding::{
    CachedEmbedder, EmbeddingError, EmbeddingProvider, HashingEmbedder, HttpEmbedder,
    HttpEmbedderConfig,
};
pub use graph::{
    GraphError, GraphFact, GraphNode, GraphProvider, GraphStats, InMemoryGraph, Neo4jConfig,
    Neo4jGraph, Subgraph,
};
pub use hashing::{fingerprint_text, hash_to_u64, point_id_for};
pub use ingest::{BatchUploader, IngestError, TravelNode, UploadConfig, UploadReport};
pub use llm::{
    ChatProvider, ChatService, CompletionOptions, EchoChatProvider, GenaiChatProvider, LlmError,
};
pub use prompt::{PromptMessage, Role, build_prompt};
pub use retrieval::{RetrievalError, RetrievalFilter, RetrievalMatch};
pub use vectordb::{
    InMemoryVectorStore, PineconeConfig, PineconeStore, QdrantStore, VectorDbError,
    VectorRecord, VectorSearchProvider,
};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use graph::MockGraph;
#[cfg(any(test, feature = "mock"))]
pub use llm::MockChatProvider;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorStore;
