use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector search backends.
pub enum VectorDbError {
    /// Could not reach the backend.
    #[error("failed to connect to {backend} at '{url}': {message}")]
    ConnectionFailed {
        backend: &'static str,
        url: String,
        message: String,
    },

    /// The request did not complete in time.
    #[error("{backend} request timed out")]
    Timeout { backend: &'static str },

    /// Index or collection creation failed.
    #[error("failed to create index '{collection}': {message}")]
    CreateCollectionFailed { collection: String, message: String },

    /// Index or collection does not exist.
    #[error("index not found: {collection}")]
    CollectionNotFound { collection: String },

    /// Upsert failed.
    #[error("failed to upsert vectors to '{collection}': {message}")]
    UpsertFailed { collection: String, message: String },

    /// Search failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed { collection: String, message: String },

    /// Vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("{backend} rejected credentials (HTTP {status})")]
    Unauthorized { backend: &'static str, status: u16 },

    #[error("{backend} rate limited the request")]
    RateLimited { backend: &'static str },

    #[error("{backend} returned HTTP {status}: {body}")]
    UpstreamStatus {
        backend: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed response from {backend}: {reason}")]
    MalformedResponse {
        backend: &'static str,
        reason: String,
    },
}

impl VectorDbError {
    /// Returns `true` for transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            VectorDbError::ConnectionFailed { .. }
            | VectorDbError::Timeout { .. }
            | VectorDbError::RateLimited { .. }
            | VectorDbError::UpsertFailed { .. }
            | VectorDbError::SearchFailed { .. } => true,
            VectorDbError::UpstreamStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
