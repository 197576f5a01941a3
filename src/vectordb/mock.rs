use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::VectorDbError;
use super::memory::InMemoryVectorStore;
use super::model::VectorRecord;
use super::provider::VectorSearchProvider;
use crate::retrieval::RetrievalMatch;

/// In-memory store with switchable failures and call counters.
#[derive(Debug)]
pub struct MockVectorStore {
    inner: InMemoryVectorStore,
    failing: AtomicBool,
    /// Upsert calls that fail before succeeding again.
    transient_upsert_failures: AtomicUsize,
    queries: AtomicUsize,
    upserts: AtomicUsize,
}

impl MockVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: InMemoryVectorStore::with_dimension(dimension),
            failing: AtomicBool::new(false),
            transient_upsert_failures: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
            upserts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryVectorStore {
        &self.inner
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes the next `n` upsert calls fail with a retryable error.
    pub fn fail_next_upserts(&self, n: usize) {
        self.transient_upsert_failures.store(n, Ordering::SeqCst);
    }

    pub fn query_calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    fn unavailable() -> VectorDbError {
        VectorDbError::ConnectionFailed {
            backend: "mock",
            url: "mock://vectors".to_string(),
            message: "backend unavailable".to_string(),
        }
    }
}

#[async_trait]
impl VectorSearchProvider for MockVectorStore {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, VectorDbError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.query(vector, top_k).await
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorDbError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let remaining = self.transient_upsert_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_upsert_failures
                .store(remaining - 1, Ordering::SeqCst);
            return Err(VectorDbError::UpstreamStatus {
                backend: "mock",
                status: 503,
                body: "try again".to_string(),
            });
        }
        self.inner.upsert(records).await
    }

    async fn ensure_index(&self, dimension: usize) -> Result<(), VectorDbError> {
        self.inner.ensure_index(dimension).await
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
