use std::sync::Arc;

use crate::assistant::HybridAssistant;

/// Shared state for every route.
#[derive(Clone, Debug)]
pub struct AppState {
    pub assistant: Arc<HybridAssistant>,
}

impl AppState {
    pub fn new(assistant: HybridAssistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}
