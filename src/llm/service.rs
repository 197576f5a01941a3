use std::sync::Arc;

use tracing::{info, warn};

use super::error::LlmError;
use super::provider::{ChatProvider, CompletionOptions};
use crate::prompt::PromptMessage;

/// Default model preference order.
pub const DEFAULT_CHAT_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "gemma2-9b-it",
];

/// A completed answer and the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

/// Tries each configured model in order until one answers.
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ChatProvider>,
    models: Vec<String>,
    options: CompletionOptions,
}

impl ChatService {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        models: Vec<String>,
        options: CompletionOptions,
    ) -> Result<Self, LlmError> {
        if models.is_empty() {
            return Err(LlmError::NoModels);
        }
        Ok(Self {
            provider,
            models,
            options,
        })
    }

    /// Uses [`DEFAULT_CHAT_MODELS`] and default sampling options.
    pub fn with_defaults(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            models: DEFAULT_CHAT_MODELS.iter().map(|m| m.to_string()).collect(),
            options: CompletionOptions::default(),
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Returns the first successful completion, or the last model's error.
    pub async fn complete(&self, messages: &[PromptMessage]) -> Result<Completion, LlmError> {
        let mut last_error = LlmError::NoModels;

        for model in &self.models {
            match self.provider.complete(model, messages, &self.options).await {
                Ok(text) => {
                    info!(model = %model, "Chat completion succeeded");
                    return Ok(Completion {
                        text,
                        model: model.clone(),
                    });
                }
                Err(e) => {
                    let reason: String = e.to_string().chars().take(100).collect();
                    warn!(model = %model, error = %reason, "Chat model failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("provider", &self.provider.name())
            .field("models", &self.models)
            .field("options", &self.options)
            .finish()
    }
}
