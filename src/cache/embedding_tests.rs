use super::embedding::{EmbeddingCache, EmbeddingCacheHandle};
use super::error::CacheError;
use crate::embedding::EmbeddingError;
use std::cell::Cell;

const DIM: usize = 4;

fn vector_for(seed: f32) -> Vec<f32> {
    vec![seed, seed + 1.0, seed + 2.0, seed + 3.0]
}

fn compute_ok(seed: f32) -> impl FnOnce(&str) -> Result<Vec<f32>, EmbeddingError> {
    move |_| Ok(vector_for(seed))
}

fn provider_down() -> EmbeddingError {
    EmbeddingError::RequestFailed {
        provider: "test".to_string(),
        reason: "connection refused".to_string(),
    }
}

#[test]
fn test_new_rejects_zero_capacity() {
    let err = EmbeddingCache::new(0, DIM).unwrap_err();
    assert_eq!(err, CacheError::InvalidCapacity { capacity: 0 });
}

#[test]
fn test_new_rejects_zero_dimension() {
    let err = EmbeddingCache::new(10, 0).unwrap_err();
    assert_eq!(err, CacheError::InvalidDimension { dimension: 0 });
}

#[test]
fn test_new_cache_is_empty() {
    let cache = EmbeddingCache::new(10, DIM).unwrap();
    assert!(cache.is_empty());
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.capacity(), 10);
    assert_eq!(cache.dimension(), DIM);
}

#[test]
fn test_miss_computes_and_stores() {
    let cache = EmbeddingCache::new(10, DIM).unwrap();

    let vector = cache
        .get_or_compute("pho in hanoi", compute_ok(1.0))
        .expect("compute should succeed");

    assert_eq!(vector, vector_for(1.0));
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.peek("pho in hanoi"), Some(vector_for(1.0)));
}

#[test]
fn test_repeated_text_computes_once() {
    let cache = EmbeddingCache::new(10, DIM).unwrap();
    let calls = Cell::new(0);

    let first = cache
        .get_or_compute("hoi an lanterns", |_| {
            calls.set(calls.get() + 1);
            Ok(vector_for(2.0))
        })
        .unwrap();
    let second = cache
        .get_or_compute("hoi an lanterns", |_| {
            calls.set(calls.get() + 1);
            Ok(vector_for(99.0))
        })
        .unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_capacity_invariant_holds_after_every_call() {
    let cache = EmbeddingCache::new(3, DIM).unwrap();

    for i in 0..50 {
        let text = format!("query number {}", i % 7);
        cache
            .get_or_compute(&text, compute_ok(i as f32))
            .expect("compute should succeed");
        assert!(cache.size() <= cache.capacity());
    }

    assert_eq!(cache.size(), 3);
}

#[test]
fn test_lru_eviction_respects_recent_access() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();

    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("B", compute_ok(2.0)).unwrap();
    cache
        .get_or_compute("A", |_| panic!("A must be served from cache"))
        .unwrap();
    cache.get_or_compute("C", compute_ok(3.0)).unwrap();

    assert!(cache.contains("A"));
    assert!(!cache.contains("B"));
    assert!(cache.contains("C"));
    assert_eq!(cache.size(), 2);
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_peek_does_not_bump_recency() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();

    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("B", compute_ok(2.0)).unwrap();

    assert!(cache.peek("A").is_some());
    cache.get_or_compute("C", compute_ok(3.0)).unwrap();

    assert!(!cache.contains("A"));
    assert!(cache.contains("B"));
    assert!(cache.contains("C"));
}

#[test]
fn test_peek_missing_returns_none() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();
    assert!(cache.peek("never embedded").is_none());
}

#[test]
fn test_compute_failure_leaves_state_unchanged() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();
    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("B", compute_ok(2.0)).unwrap();

    let err = cache
        .get_or_compute("C", |_| Err(provider_down()))
        .unwrap_err();

    assert_eq!(err, provider_down());
    assert_eq!(cache.size(), 2);
    assert!(cache.contains("A"));
    assert!(cache.contains("B"));
    assert!(!cache.contains("C"));
    assert_eq!(cache.stats().evictions, 0);
}

#[test]
fn test_failed_compute_does_not_bump_other_entries() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();
    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("B", compute_ok(2.0)).unwrap();

    let _ = cache.get_or_compute("C", |_| Err(provider_down()));
    cache.get_or_compute("D", compute_ok(4.0)).unwrap();

    assert!(!cache.contains("A"));
    assert!(cache.contains("B"));
    assert!(cache.contains("D"));
}

#[test]
fn test_empty_text_is_rejected_without_compute() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();

    let err = cache
        .get_or_compute("", |_| panic!("compute must not run for empty text"))
        .unwrap_err();

    assert!(matches!(err, EmbeddingError::InvalidInput { .. }));
    assert!(cache.is_empty());
}

#[test]
fn test_wrong_dimension_is_not_cached() {
    let cache = EmbeddingCache::new(2, DIM).unwrap();

    let err = cache
        .get_or_compute("short vector", |_| Ok(vec![1.0, 2.0]))
        .unwrap_err();

    assert_eq!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: DIM,
            actual: 2
        }
    );
    assert!(cache.is_empty());
}

#[test]
fn test_identical_text_shares_key_whitespace_does_not() {
    let cache = EmbeddingCache::new(10, DIM).unwrap();

    cache.get_or_compute("Da Nang", compute_ok(1.0)).unwrap();
    cache.get_or_compute("Da Nang ", compute_ok(2.0)).unwrap();

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.peek("Da Nang"), Some(vector_for(1.0)));
    assert_eq!(cache.peek("Da Nang "), Some(vector_for(2.0)));
}

#[test]
fn test_stats_track_hits_and_misses() {
    let cache = EmbeddingCache::new(10, DIM).unwrap();

    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("A", compute_ok(1.0)).unwrap();
    cache.get_or_compute("B", compute_ok(2.0)).unwrap();

    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.size, 2);
    assert_eq!(stats.capacity, 10);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_clear_empties_cache() {
    let cache = EmbeddingCache::new(10, DIM).unwrap();
    cache.get_or_compute("A", compute_ok(1.0)).unwrap();

    cache.clear();

    assert!(cache.is_empty());
    assert!(!cache.contains("A"));
}

#[tokio::test]
async fn test_async_miss_then_hit() {
    let cache = EmbeddingCache::new(4, DIM).unwrap();
    let calls = std::sync::atomic::AtomicUsize::new(0);

    for _ in 0..3 {
        let vector = cache
            .get_or_compute_async("mekong delta tour", |text| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async move {
                    assert_eq!(text, "mekong delta tour");
                    Ok(vector_for(5.0))
                }
            })
            .await
            .unwrap();
        assert_eq!(vector, vector_for(5.0));
    }

    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(cache.size(), 1);
}

#[tokio::test]
async fn test_async_failure_propagates_unchanged() {
    let cache = EmbeddingCache::new(4, DIM).unwrap();

    let err = cache
        .get_or_compute_async("anything", |_| async { Err(provider_down()) })
        .await
        .unwrap_err();

    assert_eq!(err, provider_down());
    assert!(err.is_retryable());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_handle_is_shared_across_tasks() {
    let handle = EmbeddingCacheHandle::new(8, DIM).unwrap();

    let mut tasks = Vec::new();
    for i in 0..8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let text = format!("city {}", i % 4);
            handle
                .get_or_compute_async(&text, |_| async move { Ok(vector_for(i as f32)) })
                .await
        }));
    }

    for task in tasks {
        task.await.expect("task should not panic").unwrap();
    }

    assert_eq!(handle.size(), 4);
    assert!(handle.size() <= handle.capacity());
    assert_eq!(handle.strong_count(), 1);
}

#[test]
fn test_handle_debug_mentions_entries() {
    let handle = EmbeddingCacheHandle::new(8, DIM).unwrap();
    let debug = format!("{:?}", handle);
    assert!(debug.contains("EmbeddingCacheHandle"));
    assert!(debug.contains("entries"));
}
