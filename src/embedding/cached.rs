use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::cache::{CacheStats, EmbeddingCacheHandle};
use crate::hashing::fingerprint_hex;

/// Routes every embedding request through the shared [`EmbeddingCacheHandle`].
///
/// The wrapper itself is an [`EmbeddingProvider`], so callers do not need to know whether
/// a cache sits in front of the model.
#[derive(Clone)]
pub struct CachedEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCacheHandle,
}

impl CachedEmbedder {
    /// Fails with [`EmbeddingError::DimensionMismatch`] when the cache and the provider
    /// disagree on vector length.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        cache: EmbeddingCacheHandle,
    ) -> Result<Self, EmbeddingError> {
        if provider.dimension() != cache.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: cache.dimension(),
                actual: provider.dimension(),
            });
        }
        Ok(Self { provider, cache })
    }

    pub fn cache(&self) -> &EmbeddingCacheHandle {
        &self.cache
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let provider = Arc::clone(&self.provider);
        let mut computed = false;
        let result = self
            .cache
            .get_or_compute_async(text, |owned| {
                computed = true;
                async move {
                    debug!(provider = provider.name(), chars = owned.len(), "Embedding cache miss");
                    provider.embed(&owned).await
                }
            })
            .await;

        match &result {
            Ok(_) if !computed => debug!(key = %fingerprint_hex(text), "Embedding cache hit"),
            Err(e) => debug!(error = %e, "Embedding failed"),
            Ok(_) => {}
        }
        result
    }

    fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_stub(&self) -> bool {
        self.provider.is_stub()
    }
}

impl std::fmt::Debug for CachedEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("provider", &self.provider.name())
            .field("cache", &self.cache)
            .finish()
    }
}
