use std::sync::Arc;

use super::*;
use crate::prompt::{PromptMessage, build_prompt};

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|m| m.to_string()).collect()
}

fn messages() -> Vec<PromptMessage> {
    build_prompt("Best beaches?", &[], &[])
}

#[tokio::test]
async fn test_first_model_wins() {
    let provider = Arc::new(MockChatProvider::new());
    let service =
        ChatService::new(provider.clone(), models(&["a", "b"]), CompletionOptions::default())
            .unwrap();

    let completion = service.complete(&messages()).await.unwrap();

    assert_eq!(completion.model, "a");
    assert_eq!(completion.text, "answer from a");
    assert_eq!(provider.models_called(), vec!["a"]);
}

#[tokio::test]
async fn test_falls_back_in_order() {
    let provider = Arc::new(MockChatProvider::new());
    provider.fail_model("a");
    provider.fail_model("b");
    let service = ChatService::new(
        provider.clone(),
        models(&["a", "b", "c"]),
        CompletionOptions::default(),
    )
    .unwrap();

    let completion = service.complete(&messages()).await.unwrap();

    assert_eq!(completion.model, "c");
    assert_eq!(provider.models_called(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_all_failing_returns_last_error() {
    let provider = Arc::new(MockChatProvider::new());
    provider.fail_model("a");
    provider.fail_model("b");
    let service =
        ChatService::new(provider, models(&["a", "b"]), CompletionOptions::default()).unwrap();

    let err = service.complete(&messages()).await.unwrap_err();

    assert!(matches!(err, LlmError::RequestFailed { ref model, .. } if model == "b"));
}

#[test]
fn test_empty_model_list_rejected() {
    let provider = Arc::new(MockChatProvider::new());
    assert_eq!(
        ChatService::new(provider, Vec::new(), CompletionOptions::default()).unwrap_err(),
        LlmError::NoModels
    );
}

#[test]
fn test_defaults() {
    let service = ChatService::with_defaults(Arc::new(EchoChatProvider));
    assert_eq!(service.models(), DEFAULT_CHAT_MODELS);

    let options = CompletionOptions::default();
    assert_eq!(options.temperature, 0.3);
    assert_eq!(options.max_tokens, 800);
}

#[tokio::test]
async fn test_echo_provider_returns_user_context() {
    let service = ChatService::with_defaults(Arc::new(EchoChatProvider));

    let completion = service.complete(&messages()).await.unwrap();

    assert!(completion.text.contains("User Query: Best beaches?"));
    assert_eq!(completion.model, DEFAULT_CHAT_MODELS[0]);
}

#[tokio::test]
async fn test_echo_provider_requires_user_message() {
    let err = EchoChatProvider
        .complete("m", &[PromptMessage::system("s")], &CompletionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse { .. }));
}
