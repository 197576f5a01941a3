use thiserror::Error;

/// Errors raised when constructing an [`EmbeddingCache`](super::EmbeddingCache).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Capacity must be at least one entry.
    #[error("invalid cache capacity {capacity}: must be greater than zero")]
    InvalidCapacity { capacity: usize },

    /// Vector dimension must be at least one.
    #[error("invalid embedding dimension {dimension}: must be greater than zero")]
    InvalidDimension { dimension: usize },
}
