//! Chat completion with an ordered model fallback chain.

pub mod echo;
pub mod error;
pub mod genai_provider;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod provider;
pub mod service;

#[cfg(test)]
mod tests;

pub use echo::EchoChatProvider;
pub use error::LlmError;
pub use genai_provider::GenaiChatProvider;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockChatProvider;
pub use provider::{ChatProvider, CompletionOptions};
pub use service::{ChatService, Completion, DEFAULT_CHAT_MODELS};
