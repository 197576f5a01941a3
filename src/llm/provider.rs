use async_trait::async_trait;

use super::error::LlmError;
use crate::prompt::PromptMessage;

/// Sampling settings for one completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

#[async_trait]
/// Hosted chat-completion model.
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[PromptMessage],
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;

    fn name(&self) -> &str;
}
