use serde::Serialize;

/// Point-in-time counters for an [`EmbeddingCache`](super::EmbeddingCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before the first lookup.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} entries, {} hits, {} misses, {} evictions",
            self.size, self.capacity, self.hits, self.misses, self.evictions
        )
    }
}
