//! Offline embedder based on signed feature hashing.

use async_trait::async_trait;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use super::utils::{l2_normalize, tokenize};
use crate::hashing::hash_to_u64;

/// Deterministic stand-in for a hosted embedding model.
///
/// Each lower-cased token is hashed with BLAKE3 into one bucket with a sign taken from the
/// top hash bit; the result is L2-normalised. Texts sharing vocabulary land close together,
/// which is enough for offline runs and tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidInput {
                reason: "embedding dimension must be greater than zero".to_string(),
            });
        }
        Ok(Self { dimension })
    }

    /// Synchronous embedding, usable with [`EmbeddingCache::get_or_compute`](crate::cache::EmbeddingCache::get_or_compute).
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput {
                reason: "text must not be blank".to_string(),
            });
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let h = hash_to_u64(token.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(text)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }

    fn is_stub(&self) -> bool {
        true
    }
}
