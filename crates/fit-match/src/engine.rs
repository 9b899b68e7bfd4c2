//! Best-fit search.
//!
//! For one target the search walks every candidate (in set order) and, for
//! each, every transformation (in set order). Pairs whose evaluation fails or
//! whose derived value the plausibility filter rejects are skipped. The pair
//! with the smallest absolute error wins; on equal errors the pair seen first
//! is kept.

use fit_core::{PlausibilityFilter, SequenceError, Transform, TransformSet, build_candidates};
use fit_model::{
    Candidate, CandidateSet, MatchResult, SearchOptions, StatusThresholds, TargetSet,
    relative_error,
};
use tracing::{debug, info_span, trace, warn};

use crate::grid::{self, GridEntry, RankedPair, ToleranceHit};
use crate::report::{MatchOutcome, MatchReport};

/// Calls `visit` for every pair that evaluates and passes the filter.
pub(crate) fn scan<'a, F>(
    candidates: &'a CandidateSet,
    transforms: &'a TransformSet,
    filter: &PlausibilityFilter,
    mut visit: F,
) where
    F: FnMut(&'a Candidate, &'a Transform, f64),
{
    for candidate in candidates {
        for transform in transforms {
            let derived = match transform.apply(&candidate.value) {
                Ok(derived) => derived,
                Err(error) => {
                    trace!(
                        candidate = %candidate.name,
                        transform = transform.name(),
                        %error,
                        "skipping pair"
                    );
                    continue;
                }
            };
            if !filter.accepts(derived) {
                continue;
            }
            visit(candidate, transform, derived);
        }
    }
}

pub(crate) fn build_result(
    candidate: &Candidate,
    transform: &Transform,
    derived: f64,
    target: f64,
    thresholds: &StatusThresholds,
) -> MatchResult {
    let error = (derived - target).abs();
    let relative_error = relative_error(error, target);
    MatchResult {
        candidate: candidate.name.clone(),
        candidate_kind: candidate.kind,
        transform: transform.name().to_string(),
        derived,
        target,
        error,
        relative_error,
        status: thresholds.categorize(error, relative_error),
    }
}

/// Best pair for `target`, labelled with the default thresholds.
///
/// Returns `None` when no pair both evaluates and passes `filter`, or when
/// `target` is not finite.
pub fn find_best_match(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    target: f64,
    filter: &PlausibilityFilter,
) -> Option<MatchResult> {
    find_best_match_with(
        candidates,
        transforms,
        target,
        filter,
        &StatusThresholds::default(),
    )
}

/// Best pair for `target`, labelled with `thresholds`.
pub fn find_best_match_with(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    target: f64,
    filter: &PlausibilityFilter,
    thresholds: &StatusThresholds,
) -> Option<MatchResult> {
    if !target.is_finite() {
        return None;
    }
    let mut best: Option<(&Candidate, &Transform, f64, f64)> = None;
    scan(candidates, transforms, filter, |candidate, transform, derived| {
        let error = (derived - target).abs();
        if best.is_none_or(|(_, _, _, best_error)| error < best_error) {
            best = Some((candidate, transform, derived, error));
        }
    });
    best.map(|(candidate, transform, derived, _)| {
        build_result(candidate, transform, derived, target, thresholds)
    })
}

/// Runs [`find_best_match`] for every target, keeping target order.
pub fn find_best_matches(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    targets: &TargetSet,
    filter: &PlausibilityFilter,
) -> MatchReport {
    find_best_matches_with(
        candidates,
        transforms,
        targets,
        filter,
        &StatusThresholds::default(),
    )
}

pub fn find_best_matches_with(
    candidates: &CandidateSet,
    transforms: &TransformSet,
    targets: &TargetSet,
    filter: &PlausibilityFilter,
    thresholds: &StatusThresholds,
) -> MatchReport {
    let span = info_span!(
        "match_all",
        targets = targets.len(),
        candidates = candidates.len(),
        transforms = transforms.len()
    );
    let _guard = span.enter();

    if candidates.is_empty() || transforms.is_empty() {
        warn!(
            candidates = candidates.len(),
            transforms = transforms.len(),
            "empty search grid, no target can match"
        );
    }

    let outcomes = targets
        .iter()
        .map(|target| {
            let result =
                find_best_match_with(candidates, transforms, target.value, filter, thresholds);
            match &result {
                Some(found) => debug!(
                    target = %target.name,
                    candidate = %found.candidate,
                    transform = %found.transform,
                    error = found.error,
                    status = found.status.label(),
                    "best match"
                ),
                None => debug!(target = %target.name, "no plausible match"),
            }
            MatchOutcome {
                target: target.name.clone(),
                target_value: target.value,
                unit: target.unit.clone(),
                result,
            }
        })
        .collect();
    MatchReport::new(outcomes)
}

/// Search configuration bundling the grid, the filter and the thresholds.
///
/// # Example
///
/// ```
/// use fit_core::transform::{TransformSet, identity};
/// use fit_match::MatchEngine;
/// use fit_model::CandidateSet;
///
/// let candidates = CandidateSet::from_reals([("two", 2.0)]).unwrap();
/// let transforms = TransformSet::new().with(identity()).unwrap();
/// let engine = MatchEngine::new(candidates, transforms);
/// let best = engine.match_target(2.5).unwrap();
/// assert_eq!(best.candidate, "two");
/// ```
#[derive(Debug, Clone)]
pub struct MatchEngine {
    candidates: CandidateSet,
    transforms: TransformSet,
    filter: PlausibilityFilter,
    thresholds: StatusThresholds,
}

impl MatchEngine {
    pub fn new(candidates: CandidateSet, transforms: TransformSet) -> Self {
        Self {
            candidates,
            transforms,
            filter: PlausibilityFilter::Any,
            thresholds: StatusThresholds::default(),
        }
    }

    /// Builds the candidate table, the preset transformations, the filter and
    /// the thresholds described by `options`.
    pub fn from_options(options: &SearchOptions) -> Result<Self, SequenceError> {
        options.validate()?;
        let candidates = build_candidates(options)?;
        let transforms = TransformSet::from_preset(options.preset);
        Ok(Self::new(candidates, transforms)
            .with_filter(options.plausibility)
            .with_thresholds(options.thresholds.thresholds()))
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<PlausibilityFilter>) -> Self {
        self.filter = filter.into();
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: StatusThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn transforms(&self) -> &TransformSet {
        &self.transforms
    }

    pub fn filter(&self) -> &PlausibilityFilter {
        &self.filter
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    pub fn match_target(&self, target: f64) -> Option<MatchResult> {
        find_best_match_with(
            &self.candidates,
            &self.transforms,
            target,
            &self.filter,
            &self.thresholds,
        )
    }

    pub fn match_all(&self, targets: &TargetSet) -> MatchReport {
        find_best_matches_with(
            &self.candidates,
            &self.transforms,
            targets,
            &self.filter,
            &self.thresholds,
        )
    }

    /// The `limit` best pairs for `target`.
    pub fn rank(&self, target: f64, limit: usize) -> Vec<RankedPair> {
        grid::rank_for_target_with(
            &self.candidates,
            &self.transforms,
            target,
            &self.filter,
            limit,
            &self.thresholds,
        )
    }

    /// Every evaluable pair that passes the filter.
    pub fn grid(&self) -> Vec<GridEntry> {
        grid::evaluate_grid_filtered(&self.candidates, &self.transforms, &self.filter)
    }

    pub fn within_tolerance(&self, targets: &TargetSet, tolerance: f64) -> Vec<ToleranceHit> {
        grid::within_tolerance_filtered(
            &self.candidates,
            &self.transforms,
            targets,
            tolerance,
            &self.filter,
        )
    }
}
