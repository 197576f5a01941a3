//! Embedding providers.
//!
//! - [`HttpEmbedder`] calls an OpenAI-compatible `/embeddings` endpoint.
//! - [`HashingEmbedder`] is the deterministic offline embedder.
//! - [`CachedEmbedder`] puts the bounded [`EmbeddingCache`](crate::cache::EmbeddingCache)
//!   in front of any of them.

/// Cache-backed provider wrapper.
pub mod cached;
mod error;
/// OpenAI-compatible HTTP embedder.
pub mod http;
/// Feature-hashing embedder.
pub mod local;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Provider trait.
pub mod provider;
/// Vector helpers.
pub mod utils;


pub use cached::CachedEmbedder;
pub use error::EmbeddingError;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
pub use local::HashingEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use provider::EmbeddingProvider;
pub use utils::{cosine_similarity, l2_normalize};
