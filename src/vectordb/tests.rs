use serde_json::json;

use super::*;
use crate::hashing::point_id_for;

const DIM: usize = 4;

fn record(id: &str, values: [f32; DIM]) -> VectorRecord {
    VectorRecord::new(id, values.to_vec(), json!({ "name": id }))
}

async fn seeded() -> InMemoryVectorStore {
    let store = InMemoryVectorStore::new();
    store.ensure_index(DIM).await.unwrap();
    store
        .upsert(vec![
            record("hanoi", [1.0, 0.0, 0.0, 0.0]),
            record("hue", [0.7, 0.7, 0.0, 0.0]),
            record("sapa", [0.0, 0.0, 1.0, 0.0]),
        ])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_memory_query_orders_by_similarity() {
    let store = seeded().await;

    let matches = store.query(&[1.0, 0.1, 0.0, 0.0], 3).await.unwrap();

    let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["hanoi", "hue", "sapa"]);
    assert!(matches[0].score > 0.99);
    assert_eq!(matches[0].name(), "hanoi");
}

#[tokio::test]
async fn test_memory_query_truncates_to_top_k() {
    let store = seeded().await;
    let matches = store.query(&[1.0, 0.0, 0.0, 0.0], 1).await.unwrap();
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn test_memory_upsert_replaces_by_id() {
    let store = seeded().await;

    let written = store
        .upsert(vec![record("sapa", [1.0, 0.0, 0.0, 0.0])])
        .await
        .unwrap();

    assert_eq!(written, 1);
    assert_eq!(store.len(), 3);
    assert_eq!(store.get("sapa").unwrap().values, vec![1.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_memory_requires_index() {
    let store = InMemoryVectorStore::new();

    let err = store.query(&[1.0; DIM], 1).await.unwrap_err();
    assert!(matches!(err, VectorDbError::CollectionNotFound { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_memory_rejects_wrong_dimension() {
    let store = seeded().await;

    assert!(matches!(
        store.query(&[1.0, 0.0], 1).await,
        Err(VectorDbError::InvalidDimension {
            expected: 4,
            actual: 2
        })
    ));
    assert!(matches!(
        store
            .upsert(vec![VectorRecord::new("x", vec![1.0], json!({}))])
            .await,
        Err(VectorDbError::InvalidDimension { .. })
    ));
    assert!(store.get("x").is_none());
}

#[tokio::test]
async fn test_memory_ensure_index_is_idempotent_but_fixed() {
    let store = InMemoryVectorStore::new();
    store.ensure_index(DIM).await.unwrap();
    store.ensure_index(DIM).await.unwrap();

    assert!(store.ensure_index(DIM + 1).await.is_err());
}

#[tokio::test]
async fn test_mock_store_failure_switch() {
    let store = MockVectorStore::new(DIM);
    store.set_failing(true);

    let err = store.query(&[1.0; DIM], 1).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(store.health_check().await.is_err());

    store.set_failing(false);
    assert!(store.query(&[1.0; DIM], 1).await.unwrap().is_empty());
    assert_eq!(store.query_calls(), 2);
}

#[tokio::test]
async fn test_mock_store_transient_upsert_failures() {
    let store = MockVectorStore::new(DIM);
    store.fail_next_upserts(1);

    let first = store.upsert(vec![record("hue", [0.0, 1.0, 0.0, 0.0])]).await;
    assert!(first.unwrap_err().is_retryable());

    let second = store.upsert(vec![record("hue", [0.0, 1.0, 0.0, 0.0])]).await;
    assert_eq!(second.unwrap(), 1);
    assert_eq!(store.upsert_calls(), 2);
}

#[test]
fn test_qdrant_point_keeps_string_id_in_payload() {
    let point = qdrant::to_point(record("poi_hoan_kiem", [0.1, 0.2, 0.3, 0.4]));

    let payload = &point.payload;
    assert_eq!(
        payload
            .get(qdrant::PAYLOAD_NODE_ID)
            .and_then(|v| v.as_str())
            .map(|s| s.as_str()),
        Some("poi_hoan_kiem")
    );
    let metadata: serde_json::Value = serde_json::from_str(
        payload
            .get(qdrant::PAYLOAD_METADATA)
            .and_then(|v| v.as_str())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(metadata["name"], "poi_hoan_kiem");

    assert_eq!(
        point.id.and_then(|p| p.point_id_options),
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Num(
            point_id_for("poi_hoan_kiem")
        ))
    );
}

#[test]
fn test_qdrant_scored_point_round_trip() {
    use qdrant_client::qdrant::ScoredPoint;

    let point = qdrant::to_point(record("city_hue", [0.0; DIM]));
    let scored = ScoredPoint {
        id: point.id,
        payload: point.payload,
        score: 0.83,
        ..Default::default()
    };

    let m = qdrant::from_scored_point(scored).unwrap();
    assert_eq!(m.id, "city_hue");
    assert_eq!(m.score, 0.83);
    assert_eq!(m.metadata["name"], "city_hue");
}

#[test]
fn test_qdrant_scored_point_without_node_id_is_skipped() {
    let scored = qdrant_client::qdrant::ScoredPoint {
        score: 0.9,
        ..Default::default()
    };
    assert!(qdrant::from_scored_point(scored).is_none());
}

#[test]
fn test_vector_error_retryability() {
    assert!(
        VectorDbError::UpstreamStatus {
            backend: "x",
            status: 502,
            body: String::new()
        }
        .is_retryable()
    );
    assert!(
        !VectorDbError::Unauthorized {
            backend: "x",
            status: 401
        }
        .is_retryable()
    );
    assert!(
        !VectorDbError::InvalidDimension {
            expected: 1,
            actual: 2
        }
        .is_retryable()
    );
}
