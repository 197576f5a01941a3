//! Bounded LRU embedding cache.

pub mod embedding;
pub mod error;
pub mod types;

#[cfg(test)]
mod embedding_tests;

pub use embedding::{EmbeddingCache, EmbeddingCacheHandle};
pub use error::CacheError;
pub use types::CacheStats;
