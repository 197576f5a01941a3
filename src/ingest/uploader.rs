use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::IngestError;
use super::prepare::IngestItem;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::vectordb::{VectorDbError, VectorRecord, VectorSearchProvider};

/// Batching and retry settings for [`BatchUploader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Items embedded and upserted per request.
    pub batch_size: usize,
    /// Pause between consecutive batches.
    pub batch_pause: Duration,
    /// Retries after the first attempt, for retryable failures only.
    pub max_retries: u32,
    /// First retry delay; doubled on each further retry.
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            batch_pause: Duration::from_millis(200),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.batch_size == 0 {
            return Err(IngestError::InvalidConfig {
                reason: "batch size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Outcome of an upload run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub batches: usize,
    pub upserted: usize,
    /// Items in batches that still failed after all retries.
    pub failed: usize,
    pub retries: usize,
}

/// Embeds prepared items in batches and upserts them into the vector store.
pub struct BatchUploader {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorSearchProvider>,
    config: UploadConfig,
}

trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        EmbeddingError::is_retryable(self)
    }
}

impl Retryable for VectorDbError {
    fn is_retryable(&self) -> bool {
        VectorDbError::is_retryable(self)
    }
}

enum BatchOutcome {
    Upserted(usize),
    /// Retryable failure that outlived every retry.
    Exhausted(IngestError),
}

impl BatchUploader {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorSearchProvider>,
        config: UploadConfig,
    ) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(Self {
            embedder,
            store,
            config,
        })
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Creates the index if needed, then uploads every item.
    ///
    /// A batch whose retryable failures outlast `max_retries` is counted as failed and the
    /// run continues; any non-retryable error stops the run.
    pub async fn upload(&self, items: &[IngestItem]) -> Result<UploadReport, IngestError> {
        self.store.ensure_index(self.embedder.dimension()).await?;

        let mut report = UploadReport::default();
        let total_batches = items.len().div_ceil(self.config.batch_size);

        for (idx, batch) in items.chunks(self.config.batch_size).enumerate() {
            if idx > 0 && !self.config.batch_pause.is_zero() {
                tokio::time::sleep(self.config.batch_pause).await;
            }

            report.batches += 1;
            match self.upload_batch(batch, &mut report.retries).await? {
                BatchOutcome::Upserted(n) => {
                    report.upserted += n;
                    debug!(batch = idx + 1, total_batches, upserted = n, "Uploaded batch");
                }
                BatchOutcome::Exhausted(e) => {
                    report.failed += batch.len();
                    warn!(batch = idx + 1, total_batches, error = %e, "Batch failed after retries");
                }
            }
        }

        info!(
            batches = report.batches,
            upserted = report.upserted,
            failed = report.failed,
            retries = report.retries,
            "Upload finished"
        );
        Ok(report)
    }

    async fn upload_batch(
        &self,
        batch: &[IngestItem],
        retries: &mut usize,
    ) -> Result<BatchOutcome, IngestError> {
        let texts: Vec<String> = batch.iter().map(|item| item.text.clone()).collect();

        let vectors = match self
            .with_retry(retries, || self.embedder.embed_batch(&texts))
            .await
        {
            Ok(vectors) => vectors,
            Err(e) if e.is_retryable() => return Ok(BatchOutcome::Exhausted(e.into())),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<VectorRecord> = batch
            .iter()
            .zip(vectors)
            .map(|(item, values)| VectorRecord::new(item.id.clone(), values, item.metadata.clone()))
            .collect();

        match self
            .with_retry(retries, || self.store.upsert(records.clone()))
            .await
        {
            Ok(n) => Ok(BatchOutcome::Upserted(n)),
            Err(e) if e.is_retryable() => Ok(BatchOutcome::Exhausted(e.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn with_retry<T, E, F, Fut>(&self, retries: &mut usize, mut op: F) -> Result<T, E>
    where
        E: Retryable + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    *retries += 1;
                    let delay = self.config.backoff_for(attempt);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "Retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl std::fmt::Debug for BatchUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchUploader")
            .field("embedder", &self.embedder.name())
            .field("store", &self.store.name())
            .field("config", &self.config)
            .finish()
    }
}
