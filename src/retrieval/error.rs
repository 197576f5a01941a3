use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}
