use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};

use super::error::LlmError;
use super::provider::{ChatProvider, CompletionOptions};
use crate::prompt::{PromptMessage, Role};

/// Chat provider backed by `genai`. Credentials come from the provider's usual
/// environment variable (`GROQ_API_KEY` for Groq models).
#[derive(Clone, Default)]
pub struct GenaiChatProvider {
    client: Client,
}

impl GenaiChatProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_chat_request(messages: &[PromptMessage]) -> ChatRequest {
    let messages: Vec<ChatMessage> = messages
        .iter()
        .map(|m| match m.role {
            Role::System => ChatMessage::system(m.content.clone()),
            Role::User => ChatMessage::user(m.content.clone()),
            Role::Assistant => ChatMessage::assistant(m.content.clone()),
        })
        .collect();
    ChatRequest::new(messages)
}

#[async_trait]
impl ChatProvider for GenaiChatProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[PromptMessage],
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let chat_options = ChatOptions::default()
            .with_temperature(options.temperature)
            .with_max_tokens(options.max_tokens);

        let response = self
            .client
            .exec_chat(model, to_chat_request(messages), Some(&chat_options))
            .await
            .map_err(|e| LlmError::RequestFailed {
                model: model.to_string(),
                reason: e.to_string(),
            })?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyResponse {
                model: model.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "genai"
    }
}

impl std::fmt::Debug for GenaiChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiChatProvider").finish_non_exhaustive()
    }
}
