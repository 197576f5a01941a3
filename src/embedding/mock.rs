use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::local::HashingEmbedder;
use super::provider::EmbeddingProvider;

/// Counting embedder for tests: deterministic vectors, optional scripted failures.
#[derive(Debug)]
pub struct MockEmbedder {
    inner: HashingEmbedder,
    calls: AtomicUsize,
    failing: Mutex<HashSet<String>>,
    fail_all: Mutex<Option<EmbeddingError>>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: HashingEmbedder::new(dimension).expect("mock dimension must be non-zero"),
            calls: AtomicUsize::new(0),
            failing: Mutex::new(HashSet::new()),
            fail_all: Mutex::new(None),
        }
    }

    /// Number of times the provider was actually invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes requests for exactly `text` fail with a retryable error.
    pub fn fail_on(&self, text: &str) {
        self.failing.lock().insert(text.to_string());
    }

    /// Makes every request fail with `error` until [`recover`](Self::recover) is called.
    pub fn fail_all(&self, error: EmbeddingError) {
        *self.fail_all.lock() = Some(error);
    }

    pub fn recover(&self) {
        *self.fail_all.lock() = None;
        self.failing.lock().clear();
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.fail_all.lock().clone() {
            return Err(err);
        }
        if self.failing.lock().contains(text) {
            return Err(EmbeddingError::RequestFailed {
                provider: "mock".to_string(),
                reason: format!("scripted failure for '{}'", text),
            });
        }

        self.inner.embed_sync(text)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn is_stub(&self) -> bool {
        true
    }
}
