use super::*;
use serde_json::json;

fn m(id: u32, score: f32) -> RetrievalMatch {
    RetrievalMatch::new(id.to_string(), score)
}

fn ids(matches: &[RetrievalMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn test_filter_threshold_example() {
    let result = filter(vec![m(1, 0.9), m(2, 0.5), m(3, 0.75)], 0.7).unwrap();

    assert_eq!(result, vec![m(1, 0.9), m(3, 0.75)]);
}

#[test]
fn test_filter_sorts_unsorted_input_descending() {
    let result = filter(vec![m(1, 0.71), m(2, 0.95), m(3, 0.8)], 0.7).unwrap();

    assert_eq!(ids(&result), vec!["2", "3", "1"]);
    assert!(result.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_filter_boundary_is_inclusive() {
    let result = filter(vec![m(1, 0.7)], 0.7).unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn test_filter_empty_input() {
    let result = filter(Vec::new(), 0.7).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_filter_nothing_passes() {
    let result = filter(vec![m(1, 0.1)], 0.7).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_filter_ties_keep_provider_order() {
    let result = filter(vec![m(1, 0.8), m(2, 0.9), m(3, 0.8), m(4, 0.8)], 0.5).unwrap();

    assert_eq!(ids(&result), vec!["2", "1", "3", "4"]);
}

#[test]
fn test_filter_is_idempotent() {
    let input = vec![m(1, 0.2), m(2, 0.99), m(3, 0.7), m(4, 0.7), m(5, 0.85)];

    for t in [0.0, 0.3, 0.7, 0.9, 1.0] {
        let once = filter(input.clone(), t).unwrap();
        let twice = filter(once.clone(), t).unwrap();
        assert_eq!(once, twice, "threshold {}", t);
    }
}

#[test]
fn test_filter_rejects_out_of_range_threshold() {
    for t in [1.5, -0.1, f32::NAN, f32::INFINITY] {
        let err = filter(vec![m(1, 0.9)], t).unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidArgument { .. }));
    }
}

#[test]
fn test_filter_accepts_unit_bounds() {
    assert_eq!(filter(vec![m(1, 0.0)], 0.0).unwrap().len(), 1);
    assert_eq!(filter(vec![m(1, 1.0), m(2, 0.999)], 1.0).unwrap().len(), 1);
}

#[test]
fn test_filter_drops_nan_scores() {
    let result = filter(vec![m(1, f32::NAN), m(2, 0.8)], 0.0).unwrap();
    assert_eq!(ids(&result), vec!["2"]);
}

#[test]
fn test_filter_passes_metadata_through() {
    let metadata = json!({"name": "Hoan Kiem Lake", "type": "Attraction", "tags": ["lake"]});
    let input = vec![m(7, 0.9).with_metadata(metadata.clone())];

    let result = filter(input, 0.5).unwrap();

    assert_eq!(result[0].metadata, metadata);
    assert_eq!(result[0].name(), "Hoan Kiem Lake");
    assert_eq!(result[0].node_type(), "Attraction");
    assert_eq!(result[0].city(), "");
}

#[test]
fn test_top_k_truncates() {
    let result = top_k(vec![m(1, 0.9), m(2, 0.8), m(3, 0.7)], 2);
    assert_eq!(ids(&result), vec!["1", "2"]);
}

#[test]
fn test_top_k_larger_than_input_returns_all() {
    let result = top_k(vec![m(1, 0.9)], 10);
    assert_eq!(result.len(), 1);
}

#[test]
fn test_top_k_zero_returns_empty() {
    assert!(top_k(vec![m(1, 0.9)], 0).is_empty());
}

#[test]
fn test_filter_top_k_applies_threshold_first() {
    let result = filter_top_k(vec![m(1, 0.2), m(2, 0.75), m(3, 0.95), m(4, 0.8)], 0.7, 2).unwrap();
    assert_eq!(ids(&result), vec!["3", "4"]);
}

#[test]
fn test_retrieval_filter_validates_once() {
    assert!(RetrievalFilter::new(1.5).is_err());

    let f = RetrievalFilter::new(0.7).unwrap();
    assert_eq!(f.threshold(), 0.7);
    assert_eq!(
        f.apply(vec![m(1, 0.9), m(2, 0.5), m(3, 0.75)]),
        vec![m(1, 0.9), m(3, 0.75)]
    );
    assert_eq!(f.apply_top_k(vec![m(1, 0.9), m(3, 0.75)], 1), vec![m(1, 0.9)]);
}

#[test]
fn test_retrieval_filter_default_threshold() {
    assert_eq!(
        RetrievalFilter::default().threshold(),
        crate::constants::DEFAULT_SCORE_THRESHOLD
    );
}

#[test]
fn test_match_deserializes_without_metadata() {
    let parsed: RetrievalMatch = serde_json::from_value(json!({"id": "x", "score": 0.5})).unwrap();
    assert_eq!(parsed.metadata, serde_json::Value::Null);
}
