//! Cross-cutting, shared constants.
//!
//! The embedding dimension is fixed when the embedding cache is constructed and must agree
//! with the embedding provider and the vector index; [`crate::embedding::CachedEmbedder`]
//! checks the first two, [`crate::vectordb::VectorSearchProvider::ensure_index`] the last.

pub const DEFAULT_EMBEDDING_DIM: usize = 768;

pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.70;

pub const DEFAULT_CACHE_CAPACITY: usize = 1_000;

pub const DEFAULT_TOP_K: usize = 5;

/// Neighbor facts fetched per matched node.
pub const DEFAULT_NEIGHBORS_PER_NODE: usize = 10;

/// Characters of a neighbor description kept in graph facts.
pub const GRAPH_DESCRIPTION_MAX_CHARS: usize = 200;

/// Characters of a node description used as semantic text when none is provided.
pub const SEMANTIC_TEXT_MAX_CHARS: usize = 1_000;

pub const MAX_PROMPT_VECTOR_LINES: usize = 8;

pub const MAX_PROMPT_GRAPH_LINES: usize = 15;
