use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by graph backends.
pub enum GraphError {
    #[error("failed to connect to graph database at '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    #[error("graph request timed out")]
    Timeout,

    #[error("graph database rejected credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("graph database returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The query ran but the database reported an error.
    #[error("graph query failed ({code}): {message}")]
    QueryFailed { code: String, message: String },

    #[error("malformed graph response: {reason}")]
    MalformedResponse { reason: String },

    #[error("invalid graph URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },
}

impl GraphError {
    /// Returns `true` for transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            GraphError::ConnectionFailed { .. } | GraphError::Timeout => true,
            GraphError::UpstreamStatus { status, .. } => *status >= 500,
            GraphError::QueryFailed { code, .. } => code.contains("TransientError"),
            _ => false,
        }
    }
}
