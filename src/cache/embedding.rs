//! Bounded LRU cache for embedding vectors (in-memory).
//!
//! Keys are BLAKE3 fingerprints of the exact input text; values are the vectors returned by
//! the embedding provider. One mutex guards the map and the recency list together, and it
//! is never held while the provider is running.

use lru::LruCache;
use parking_lot::Mutex;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::CacheError;
use super::types::CacheStats;
use crate::embedding::EmbeddingError;
use crate::hashing::{Fingerprint, fingerprint_text};

/// Fixed-capacity text → vector cache with least-recently-used eviction.
pub struct EmbeddingCache {
    entries: Mutex<LruCache<Fingerprint, Arc<[f32]>>>,
    capacity: NonZeroUsize,
    dimension: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl EmbeddingCache {
    /// Creates a cache holding at most `capacity` vectors of length `dimension`.
    pub fn new(capacity: usize, dimension: usize) -> Result<Self, CacheError> {
        let cap = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity { capacity })?;
        if dimension == 0 {
            return Err(CacheError::InvalidDimension { dimension });
        }

        Ok(Self {
            entries: Mutex::new(LruCache::new(cap)),
            capacity: cap,
            dimension,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    /// Returns the cached vector for `text`, computing and storing it on a miss.
    ///
    /// On a hit the entry becomes most-recently-used and `compute` is not called. When
    /// `compute` fails the cache is left untouched and the error is returned as-is.
    pub fn get_or_compute<F>(&self, text: &str, compute: F) -> Result<Vec<f32>, EmbeddingError>
    where
        F: FnOnce(&str) -> Result<Vec<f32>, EmbeddingError>,
    {
        check_text(text)?;
        let key = fingerprint_text(text);

        if let Some(vector) = self.lookup(&key) {
            return Ok(vector);
        }

        let vector = compute(text)?;
        self.store(key, vector)
    }

    /// Async form of [`get_or_compute`](Self::get_or_compute) for network-backed providers.
    ///
    /// Concurrent misses for the same text are not coalesced; each caller may compute and
    /// the last insert wins.
    pub async fn get_or_compute_async<F, Fut>(
        &self,
        text: &str,
        compute: F,
    ) -> Result<Vec<f32>, EmbeddingError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<f32>, EmbeddingError>>,
    {
        check_text(text)?;
        let key = fingerprint_text(text);

        if let Some(vector) = self.lookup(&key) {
            return Ok(vector);
        }

        let vector = compute(text.to_owned()).await?;
        self.store(key, vector)
    }

    /// Returns the cached vector without changing recency order.
    pub fn peek(&self, text: &str) -> Option<Vec<f32>> {
        let key = fingerprint_text(text);
        self.entries.lock().peek(&key).map(|v| v.to_vec())
    }

    /// Returns `true` if `text` is cached. Does not change recency order.
    pub fn contains(&self, text: &str) -> bool {
        let key = fingerprint_text(text);
        self.entries.lock().contains(&key)
    }

    /// Number of cached vectors.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Snapshot of hit/miss/eviction counters and occupancy.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.size(),
            capacity: self.capacity(),
        }
    }

    fn lookup(&self, key: &Fingerprint) -> Option<Vec<f32>> {
        let found = self.entries.lock().get(key).map(|v| v.to_vec());
        match found {
            Some(vector) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(vector)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn store(&self, key: Fingerprint, vector: Vec<f32>) -> Result<Vec<f32>, EmbeddingError> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let displaced = self.entries.lock().push(key, Arc::from(vector.as_slice()));

        // `push` also hands back the old value when the key was already present.
        if let Some((old_key, _)) = displaced
            && old_key != key
        {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        Ok(vector)
    }
}

fn check_text(text: &str) -> Result<(), EmbeddingError> {
    if text.is_empty() {
        return Err(EmbeddingError::InvalidInput {
            reason: "text must not be empty".to_string(),
        });
    }
    Ok(())
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.size())
            .field("capacity", &self.capacity)
            .field("dimension", &self.dimension)
            .finish()
    }
}

#[derive(Clone)]
/// Shared handle to an [`EmbeddingCache`].
pub struct EmbeddingCacheHandle {
    inner: Arc<EmbeddingCache>,
}

impl EmbeddingCacheHandle {
    /// Creates a new handle around a fresh cache.
    pub fn new(capacity: usize, dimension: usize) -> Result<Self, CacheError> {
        Ok(Self {
            inner: Arc::new(EmbeddingCache::new(capacity, dimension)?),
        })
    }

    #[inline]
    pub fn get_or_compute<F>(&self, text: &str, compute: F) -> Result<Vec<f32>, EmbeddingError>
    where
        F: FnOnce(&str) -> Result<Vec<f32>, EmbeddingError>,
    {
        self.inner.get_or_compute(text, compute)
    }

    #[inline]
    pub async fn get_or_compute_async<F, Fut>(
        &self,
        text: &str,
        compute: F,
    ) -> Result<Vec<f32>, EmbeddingError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Vec<f32>, EmbeddingError>>,
    {
        self.inner.get_or_compute_async(text, compute).await
    }

    #[inline]
    pub fn peek(&self, text: &str) -> Option<Vec<f32>> {
        self.inner.peek(text)
    }

    #[inline]
    pub fn contains(&self, text: &str) -> bool {
        self.inner.contains(text)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    #[inline]
    pub fn clear(&self) {
        self.inner.clear();
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    /// Returns the number of strong references to the underlying cache.
    #[inline]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl std::fmt::Debug for EmbeddingCacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCacheHandle")
            .field("cache", &self.inner)
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
