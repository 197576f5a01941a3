use thiserror::Error;

/// Errors surfaced by embedding providers and by the embedding cache on their behalf.
///
/// Provider failures pass through the cache unchanged so a higher layer can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    #[error("invalid embedding input: {reason}")]
    InvalidInput { reason: String },

    #[error("request to embedding provider '{provider}' failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("embedding provider '{provider}' timed out after {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },

    #[error("embedding provider '{provider}' rate limited the request")]
    RateLimited { provider: String },

    #[error("embedding provider '{provider}' rejected credentials (HTTP {status})")]
    Unauthorized { provider: String, status: u16 },

    #[error("embedding provider '{provider}' returned HTTP {status}: {body}")]
    UpstreamStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("malformed response from embedding provider '{provider}': {reason}")]
    MalformedResponse { provider: String, reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl EmbeddingError {
    /// Returns `true` for failures that may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::RequestFailed { .. }
            | EmbeddingError::Timeout { .. }
            | EmbeddingError::RateLimited { .. } => true,
            EmbeddingError::UpstreamStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
