use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by chat-completion providers.
pub enum LlmError {
    #[error("chat completion with model '{model}' failed: {reason}")]
    RequestFailed { model: String, reason: String },

    #[error("model '{model}' returned an empty response")]
    EmptyResponse { model: String },

    #[error("no chat models configured")]
    NoModels,
}
