//! Whole-grid listings: every evaluable pair, rankings and reverse lookups.

use std::cmp::Ordering;

use fit_core::{PlausibilityFilter, TransformSet};
use fit_model::{CandidateKind, CandidateSet, MatchResult, StatusThresholds, Target, TargetSet};
use serde::Serialize;

use crate::engine::{build_result, scan};

/// One evaluated (candidate, transformation) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridEntry {
    pub candidate: String,
    pub kind: CandidateKind,
    pub transform: String,
    pub value: f64,
}

/// A pair's position in the ranking for one target, starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPair {
    pub rank: usize,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// A grid value that lies close to some target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToleranceHit {
    pub candidate: String,
    pub transform: String,
    pub value: f64,
    pub target: String,
    pub target_value: f64,
    pub error: f64,
}

/// Every pair that evaluates, in iteration order.
pub fn evaluate_grid(candidates: &CandidateSet, transforms: &TransformSet) -> Vec<GridEntry> {
    evaluate_grid_filtered(candidates, transforms, &PlausibilityFilter::Any)
}

/// Every pair that evaluates and passes `filter`, in iteration order.
pub fn evaluate_grid_filtered(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    filter: &PlausibilityFilter,
) -> Vec<GridEntry> {
    let mut entries = Vec::with_capacity(candidates.len() * transforms.len());
    scan(candidates, transforms, filter, |candidate, transform, value| {
        entries.push(GridEntry {
            candidate: candidate.name.clone(),
            kind: candidate.kind,
            transform: transform.name().to_string(),
            value,
        });
    });
    entries
}

/// The `limit` best pairs for `target`, labelled with the default thresholds.
pub fn rank_for_target(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    target: f64,
    filter: &PlausibilityFilter,
    limit: usize,
) -> Vec<RankedPair> {
    rank_for_target_with(
        candidates,
        transforms,
        target,
        filter,
        limit,
        &StatusThresholds::default(),
    )
}

/// Pairs are sorted by error; equal errors keep iteration order, so the
/// first entry always agrees with [`crate::find_best_match`].
pub fn rank_for_target_with(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    target: f64,
    filter: &PlausibilityFilter,
    limit: usize,
    thresholds: &StatusThresholds,
) -> Vec<RankedPair> {
    if limit == 0 || !target.is_finite() {
        return Vec::new();
    }
    let mut results = Vec::new();
    scan(candidates, transforms, filter, |candidate, transform, derived| {
        results.push(build_result(candidate, transform, derived, target, thresholds));
    });
    results.sort_by(|a, b| a.error.partial_cmp(&b.error).unwrap_or(Ordering::Equal));
    results
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, result)| RankedPair {
            rank: i + 1,
            result,
        })
        .collect()
}

/// Target closest to `value`, with its absolute error. The first target wins
/// ties.
pub fn nearest_target(value: f64, targets: &TargetSet) -> Option<(&Target, f64)> {
    let mut nearest: Option<(&Target, f64)> = None;
    for target in targets {
        let error = (value - target.value).abs();
        if nearest.is_none_or(|(_, best)| error < best) {
            nearest = Some((target, error));
        }
    }
    nearest
}

/// Grid pairs whose nearest target lies strictly within `tolerance`.
pub fn within_tolerance(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    targets: &TargetSet,
    tolerance: f64,
) -> Vec<ToleranceHit> {
    within_tolerance_filtered(
        candidates,
        transforms,
        targets,
        tolerance,
        &PlausibilityFilter::Any,
    )
}

pub fn within_tolerance_filtered(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    targets: &TargetSet,
    tolerance: f64,
    filter: &PlausibilityFilter,
) -> Vec<ToleranceHit> {
    let mut hits = Vec::new();
    scan(candidates, transforms, filter, |candidate, transform, value| {
        if let Some((target, error)) = nearest_target(value, targets)
            && error < tolerance
        {
            hits.push(ToleranceHit {
                candidate: candidate.name.clone(),
                transform: transform.name().to_string(),
                value,
                target: target.name.clone(),
                target_value: target.value,
                error,
            });
        }
    });
    hits
}

#[cfg(test)]
mod tests {
    use fit_core::Transform;
    use fit_core::transform::reciprocal;

    use super::*;

    fn transforms() -> TransformSet {
        TransformSet::new()
            .with(Transform::scalar("x", |x| x))
            .and_then(|set| set.with(reciprocal()))
            .unwrap()
    }

    #[test]
    fn grid_omits_failed_pairs() {
        let candidates = CandidateSet::from_reals([("zero", 0.0), ("two", 2.0)]).unwrap();
        let grid = evaluate_grid(&candidates, &transforms());
        let labels: Vec<(&str, &str)> = grid
            .iter()
            .map(|e| (e.candidate.as_str(), e.transform.as_str()))
            .collect();
        assert_eq!(labels, vec![("zero", "x"), ("two", "x"), ("two", "1/x")]);
    }

    #[test]
    fn ranking_is_stable_for_equal_errors() {
        let candidates = CandidateSet::from_reals([("a", 1.0), ("b", 3.0), ("c", 2.5)]).unwrap();
        let ranked = rank_for_target(&candidates, &transforms(), 2.0, &PlausibilityFilter::Any, 3);
        let names: Vec<(&str, &str)> = ranked
            .iter()
            .map(|r| (r.result.candidate.as_str(), r.result.transform.as_str()))
            .collect();
        assert_eq!(names, vec![("c", "x"), ("a", "x"), ("a", "1/x")]);
        assert_eq!(ranked[0].rank, 1);
        assert!(rank_for_target(&candidates, &transforms(), 2.0, &PlausibilityFilter::Any, 0).is_empty());
    }

    #[test]
    fn nearest_target_prefers_first_on_ties() {
        let targets = TargetSet::from_pairs([("low", 1.0), ("high", 3.0)]).unwrap();
        let (target, error) = nearest_target(2.0, &targets).unwrap();
        assert_eq!(target.name, "low");
        assert_eq!(error, 1.0);
        assert!(nearest_target(2.0, &TargetSet::new()).is_none());
    }

    #[test]
    fn tolerance_listing() {
        let candidates = CandidateSet::from_reals([("a", 0.5), ("b", 4.0)]).unwrap();
        let targets = TargetSet::from_pairs([("half", 0.25), ("two", 2.001)]).unwrap();
        let hits = within_tolerance(&candidates, &transforms(), &targets, 0.01);
        let found: Vec<(&str, &str, &str)> = hits
            .iter()
            .map(|h| (h.candidate.as_str(), h.transform.as_str(), h.target.as_str()))
            .collect();
        assert_eq!(found, vec![("a", "1/x", "two"), ("b", "1/x", "half")]);
    }
}
