use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::LlmError;
use super::provider::{ChatProvider, CompletionOptions};
use crate::prompt::PromptMessage;

/// Records every call and fails for selected models.
#[derive(Debug, Default)]
pub struct MockChatProvider {
    failing_models: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, Vec<PromptMessage>)>>,
}

impl MockChatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_model(&self, model: &str) {
        self.failing_models.lock().insert(model.to_string());
    }

    /// Models called so far, in order.
    pub fn models_called(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Messages of the most recent call.
    pub fn last_messages(&self) -> Option<Vec<PromptMessage>> {
        self.calls.lock().last().map(|(_, msgs)| msgs.clone())
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[PromptMessage],
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.calls
            .lock()
            .push((model.to_string(), messages.to_vec()));

        if self.failing_models.lock().contains(model) {
            return Err(LlmError::RequestFailed {
                model: model.to_string(),
                reason: "model decommissioned".to_string(),
            });
        }
        Ok(format!("answer from {}", model))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
