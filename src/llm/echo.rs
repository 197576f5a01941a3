use async_trait::async_trait;

use super::error::LlmError;
use super::provider::{ChatProvider, CompletionOptions};
use crate::prompt::{PromptMessage, Role};

/// Offline provider that answers with the context it was given. Used when no model
/// credentials are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoChatProvider;

#[async_trait]
impl ChatProvider for EchoChatProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[PromptMessage],
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .ok_or_else(|| LlmError::EmptyResponse {
                model: model.to_string(),
            })?;

        Ok(format!(
            "[offline mode: no language model configured]\n\n{}",
            user.content
        ))
    }

    fn name(&self) -> &str {
        "echo"
    }
}
