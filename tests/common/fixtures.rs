//! A small Vietnam travel dataset and an assistant wired to mock providers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use vista::assistant::{AssistantConfig, HybridAssistant};
use vista::cache::EmbeddingCacheHandle;
use vista::embedding::{CachedEmbedder, MockEmbedder};
use vista::graph::{InMemoryGraph, MockGraph};
use vista::ingest::{BatchUploader, TravelNode, UploadConfig, prepare_items};
use vista::llm::{ChatService, CompletionOptions, MockChatProvider};
use vista::vectordb::MockVectorStore;

pub const DIM: usize = 64;

pub const HANOI_TEXT: &str =
    "Hanoi capital city of Vietnam old quarter street food pho lakes temples";
pub const HALONG_TEXT: &str = "Ha Long Bay limestone karsts overnight cruise kayaking caves";
pub const TEMPLE_TEXT: &str = "Temple of Literature first national university Confucian garden";

pub fn dataset_json() -> serde_json::Value {
    json!([
        {
            "id": "city_hanoi",
            "type": "City",
            "name": "Hanoi",
            "description": "Capital of Vietnam.",
            "semantic_text": HANOI_TEXT,
            "region": "North",
            "tags": ["culture", "food"],
            "best_time_to_visit": "October to December",
            "connections": [{"relation": "Connected_To", "target": "city_halong"}]
        },
        {
            "id": "city_halong",
            "type": "City",
            "name": "Ha Long",
            "description": "Gateway to Ha Long Bay.",
            "semantic_text": HALONG_TEXT,
            "region": "North",
            "tags": ["nature"]
        },
        {
            "id": "attr_temple_literature",
            "type": "Attraction",
            "name": "Temple of Literature",
            "description": "Temple dedicated to Confucius.",
            "semantic_text": TEMPLE_TEXT,
            "city": "Hanoi",
            "connections": [{"relation": "Located_In", "target": "city_hanoi"}]
        },
        {
            "id": "food_pho",
            "type": "Food",
            "name": "Pho",
            "description": "Beef noodle soup eaten for breakfast across the north.",
            "region": "North",
            "connections": [{"relation": "Popular_In", "target": "city_hanoi"}]
        },
        {
            "id": "note_blank",
            "type": "Note",
            "name": "Untitled",
            "description": "   "
        }
    ])
}

pub fn dataset() -> Vec<TravelNode> {
    serde_json::from_value(dataset_json()).expect("fixture dataset is valid")
}

/// Writes the fixture dataset to a temp file. Keep the `TempDir` alive while the path is used.
pub fn dataset_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("vietnam_travel_dataset.json");
    std::fs::write(&path, dataset_json().to_string()).expect("write dataset");
    (dir, path)
}

pub fn fast_upload_config() -> UploadConfig {
    UploadConfig {
        batch_size: 2,
        batch_pause: Duration::ZERO,
        max_retries: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(4),
    }
}

pub struct TestAssistant {
    pub assistant: HybridAssistant,
    pub embedder: Arc<MockEmbedder>,
    pub store: Arc<MockVectorStore>,
    pub graph: Arc<MockGraph>,
    pub chat: Arc<MockChatProvider>,
}

/// Ingests `nodes` into a mock store and builds an assistant over it.
pub async fn build_assistant(nodes: &[TravelNode]) -> TestAssistant {
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let store = Arc::new(MockVectorStore::new(DIM));

    let uploader = BatchUploader::new(embedder.clone(), store.clone(), fast_upload_config())
        .expect("valid upload config");
    uploader
        .upload(&prepare_items(nodes))
        .await
        .expect("fixture upload");

    let graph = Arc::new(MockGraph::new(InMemoryGraph::from_dataset(nodes)));

    let cache = EmbeddingCacheHandle::new(32, DIM).expect("valid cache");
    let cached = CachedEmbedder::new(embedder.clone(), cache).expect("matching dimensions");

    let chat = Arc::new(MockChatProvider::new());
    let service = ChatService::new(
        chat.clone(),
        vec!["primary".to_string(), "fallback".to_string()],
        CompletionOptions::default(),
    )
    .expect("models configured");

    let assistant = HybridAssistant::new(
        cached,
        store.clone(),
        graph.clone(),
        service,
        AssistantConfig::default(),
    );

    TestAssistant {
        assistant,
        embedder,
        store,
        graph,
        chat,
    }
}
