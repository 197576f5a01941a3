use std::cmp::Ordering;

use super::error::RetrievalError;
use super::types::RetrievalMatch;

/// Keeps matches with `score >= threshold`, ordered by descending score.
///
/// The sort is stable, so equal scores keep the provider's order. Provider order is never
/// assumed to be score-sorted. `threshold` must be finite and within `[0, 1]`.
pub fn filter(
    matches: Vec<RetrievalMatch>,
    threshold: f32,
) -> Result<Vec<RetrievalMatch>, RetrievalError> {
    validate_threshold(threshold)?;
    Ok(filter_unchecked(matches, threshold))
}

/// Returns at most the first `k` matches.
pub fn top_k(mut matches: Vec<RetrievalMatch>, k: usize) -> Vec<RetrievalMatch> {
    matches.truncate(k);
    matches
}

/// [`filter`] followed by [`top_k`].
pub fn filter_top_k(
    matches: Vec<RetrievalMatch>,
    threshold: f32,
    k: usize,
) -> Result<Vec<RetrievalMatch>, RetrievalError> {
    Ok(top_k(filter(matches, threshold)?, k))
}

pub fn validate_threshold(threshold: f32) -> Result<(), RetrievalError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(RetrievalError::InvalidArgument {
            reason: format!("threshold {} must be within [0, 1]", threshold),
        });
    }
    Ok(())
}

fn filter_unchecked(matches: Vec<RetrievalMatch>, threshold: f32) -> Vec<RetrievalMatch> {
    // NaN scores fail the comparison and are dropped here, so the sort sees only numbers.
    let mut kept: Vec<RetrievalMatch> = matches
        .into_iter()
        .filter(|m| m.passes(threshold))
        .collect();

    kept.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    kept
}

/// A validated similarity threshold, built once from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalFilter {
    threshold: f32,
}

impl RetrievalFilter {
    pub fn new(threshold: f32) -> Result<Self, RetrievalError> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn apply(&self, matches: Vec<RetrievalMatch>) -> Vec<RetrievalMatch> {
        filter_unchecked(matches, self.threshold)
    }

    pub fn apply_top_k(&self, matches: Vec<RetrievalMatch>, k: usize) -> Vec<RetrievalMatch> {
        top_k(self.apply(matches), k)
    }
}

impl Default for RetrievalFilter {
    fn default() -> Self {
        Self {
            threshold: crate::constants::DEFAULT_SCORE_THRESHOLD,
        }
    }
}
