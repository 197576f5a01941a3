use async_trait::async_trait;

use super::error::VectorDbError;
use super::model::VectorRecord;
use crate::retrieval::RetrievalMatch;

#[async_trait]
/// Nearest-neighbour search over stored node embeddings.
///
/// Results come back in backend order; callers never assume they are sorted by score.
pub trait VectorSearchProvider: Send + Sync {
    /// Returns up to `top_k` matches for `vector`, metadata included.
    async fn query(&self, vector: &[f32], top_k: usize)
    -> Result<Vec<RetrievalMatch>, VectorDbError>;

    /// Inserts or replaces records by id. Returns how many were written.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorDbError>;

    /// Creates the index/collection for `dimension`-length vectors if it does not exist.
    async fn ensure_index(&self, dimension: usize) -> Result<(), VectorDbError>;

    async fn health_check(&self) -> Result<(), VectorDbError>;

    fn name(&self) -> &str;
}
