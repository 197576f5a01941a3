//! End-to-end HTTP tests against a served router.

mod common;

use serde_json::{Value, json};

use common::fixtures::{HALONG_TEXT, HANOI_TEXT, build_assistant, dataset};
use common::harness::spawn_test_server;

async fn post_chat(url: &str, message: &str) -> (reqwest::StatusCode, Option<String>, Value) {
    let response = reqwest::Client::new()
        .post(format!("{url}/api/chat"))
        .json(&json!({ "message": message }))
        .send()
        .await
        .expect("request should succeed");

    let status = response.status();
    let context = response
        .headers()
        .get("x-vista-context")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.json().await.expect("JSON body");
    (status, context, body)
}

async fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
    let response = reqwest::get(url).await.expect("request should succeed");
    let status = response.status();
    (status, response.json().await.expect("JSON body"))
}

#[tokio::test]
async fn test_healthz_returns_ok() {
    let t = build_assistant(&dataset()).await;
    let server = spawn_test_server(t.assistant).await.expect("server starts");

    let (status, body) = get_json(&format!("{}/healthz", server.url())).await;

    assert!(status.is_success());
    assert_eq!(body["status"], "ok");
    server.shutdown().await;
}

#[tokio::test]
async fn test_chat_hybrid_answer_over_http() {
    let t = build_assistant(&dataset()).await;
    let server = spawn_test_server(t.assistant).await.expect("server starts");

    let (status, context, body) = post_chat(&server.url(), HANOI_TEXT).await;

    assert!(status.is_success());
    assert_eq!(context.as_deref(), Some("HYBRID"));
    assert_eq!(body["response"], "answer from primary");
    assert_eq!(body["matches"][0]["id"], "city_hanoi");
    assert_eq!(body["matches"][0]["metadata"]["name"], "Hanoi");
    assert_eq!(body["graph_nodes"][0], "city_hanoi");

    let prompt = &t.chat.last_messages().expect("model called")[1].content;
    assert!(prompt.starts_with(&format!("User Query: {HANOI_TEXT}")));
    assert!(prompt.contains("--[Located_In]--> Node attr_temple_literature"));
    server.shutdown().await;
}

#[tokio::test]
async fn test_chat_falls_back_to_second_model() {
    let t = build_assistant(&dataset()).await;
    t.chat.fail_model("primary");
    let server = spawn_test_server(t.assistant).await.expect("server starts");

    let (status, _, body) = post_chat(&server.url(), HALONG_TEXT).await;

    assert!(status.is_success());
    assert_eq!(body["response"], "answer from fallback");
    assert_eq!(t.chat.models_called(), vec!["primary", "fallback"]);
    server.shutdown().await;
}

#[tokio::test]
async fn test_chat_apologises_when_every_model_fails() {
    let t = build_assistant(&dataset()).await;
    t.chat.fail_model("primary");
    t.chat.fail_model("fallback");
    let server = spawn_test_server(t.assistant).await.expect("server starts");

    let (status, _, body) = post_chat(&server.url(), HALONG_TEXT).await;

    assert!(status.is_success());
    assert_eq!(body["response"], vista::APOLOGY_MESSAGE);
    server.shutdown().await;
}

#[tokio::test]
async fn test_empty_message_rejected() {
    let t = build_assistant(&dataset()).await;
    let server = spawn_test_server(t.assistant).await.expect("server starts");

    let (status, context, body) = post_chat(&server.url(), "").await;

    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert!(context.is_none());
    assert_eq!(body, json!({"error": "Empty query"}));
    server.shutdown().await;
}

#[tokio::test]
async fn test_graph_endpoints_reflect_dataset() {
    let t = build_assistant(&dataset()).await;
    let server = spawn_test_server(t.assistant).await.expect("server starts");
    let url = server.url();

    let (status, initial) = get_json(&format!("{url}/api/graph/initial")).await;
    assert!(status.is_success());
    assert_eq!(initial["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(initial["edges"].as_array().unwrap().len(), 3);

    let (_, around) = get_json(&format!("{url}/api/graph/city_hanoi")).await;
    assert_eq!(around["edges"].as_array().unwrap().len(), 3);
    assert!(
        around["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["label"] == "Pho" && n["type"] == "Food")
    );

    let (_, stats) = get_json(&format!("{url}/api/graph/stats")).await;
    assert_eq!(stats["node_count"], 5);
    assert_eq!(stats["relationship_count"], 3);
    assert_eq!(stats["sample_nodes"][0]["best_time_to_visit"], "October to December");
    assert!(stats["sample_nodes"][0].get("connections").is_none());
    server.shutdown().await;
}

#[tokio::test]
async fn test_health_and_cache_stats() {
    let t = build_assistant(&dataset()).await;
    let server = spawn_test_server(t.assistant).await.expect("server starts");
    let url = server.url();

    post_chat(&url, HANOI_TEXT).await;
    post_chat(&url, HANOI_TEXT).await;

    let (status, cache) = get_json(&format!("{url}/api/cache/stats")).await;
    assert!(status.is_success());
    assert_eq!(cache["hits"], 1);
    assert_eq!(cache["misses"], 1);
    assert_eq!(cache["capacity"], 32);

    let (status, health) = get_json(&format!("{url}/health")).await;
    assert!(status.is_success());
    assert_eq!(health["status"], "ok");
    assert_eq!(health["chat_models"], json!(["primary", "fallback"]));
    server.shutdown().await;
}
