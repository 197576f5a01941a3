use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors raised while loading or uploading the travel dataset.
pub enum IngestError {
    #[error("failed to read dataset '{path}': {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("failed to parse dataset '{path}': {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("invalid upload settings: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store failed: {0}")]
    VectorStore(#[from] VectorDbError),
}
