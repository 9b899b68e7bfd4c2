use fit_core::transform::{TransformSet, reciprocal};
use fit_core::{PlausibilityFilter, Transform};
use fit_match::{MatchEngine, find_best_match, find_best_matches, rank_for_target};
use fit_model::{CandidateSet, MatchStatus, RangeFilter, SearchOptions, TargetSet, TransformPreset};
use proptest::prelude::*;

fn id_double() -> TransformSet {
    TransformSet::new()
        .with(Transform::scalar("id", |v| v))
        .and_then(|set| set.with(Transform::scalar("double", |v| 2.0 * v)))
        .unwrap()
}

fn xy() -> CandidateSet {
    CandidateSet::from_reals([("x", 2.0), ("y", 3.0)]).unwrap()
}

fn summary(result: &fit_model::MatchResult) -> (&str, &str, f64, f64) {
    (
        result.candidate.as_str(),
        result.transform.as_str(),
        result.derived,
        result.error,
    )
}

#[test]
fn exact_pair_wins() {
    let best = find_best_match(&xy(), &id_double(), 4.0, &PlausibilityFilter::Any).unwrap();
    assert_eq!(summary(&best), ("x", "double", 4.0, 0.0));
}

#[test]
fn filter_prunes_plausibility_not_closeness() {
    let filter = PlausibilityFilter::from(RangeFilter::open_closed(0.0, 10.0));
    let best = find_best_match(&xy(), &id_double(), 100.0, &filter).unwrap();
    assert_eq!(summary(&best), ("y", "double", 6.0, 94.0));

    let filter = PlausibilityFilter::from(RangeFilter::open_closed(0.0, 2.0));
    let best = find_best_match(&xy(), &id_double(), 100.0, &filter).unwrap();
    assert_eq!(summary(&best), ("x", "id", 2.0, 98.0));
}

#[test]
fn division_by_zero_is_excluded() {
    let candidates = CandidateSet::from_reals([("zero", 0.0), ("four", 4.0)]).unwrap();
    let transforms = TransformSet::new()
        .with(reciprocal())
        .and_then(|set| set.with(Transform::scalar("id", |v| v)))
        .unwrap();
    let ranked = rank_for_target(
        &candidates,
        &transforms,
        0.0,
        &PlausibilityFilter::Any,
        10,
    );
    assert!(
        ranked
            .iter()
            .all(|r| !(r.result.candidate == "zero" && r.result.transform == "1/x"))
    );
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].result.candidate, "zero");
    assert_eq!(ranked[0].result.transform, "id");
}

#[test]
fn rejecting_filter_gives_no_match() {
    let filter = PlausibilityFilter::custom(|_| false);
    assert!(find_best_match(&xy(), &id_double(), 4.0, &filter).is_none());
    let targets = TargetSet::from_pairs([("a", 1.0)]).unwrap();
    let report = find_best_matches(&xy(), &id_double(), &targets, &filter);
    assert_eq!(report.unmatched(), vec!["a"]);
    assert_eq!(report.matched_count(), 0);
}

#[test]
fn non_finite_target_has_no_match() {
    for target in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(find_best_match(&xy(), &id_double(), target, &PlausibilityFilter::Any).is_none());
        assert!(
            rank_for_target(&xy(), &id_double(), target, &PlausibilityFilter::Any, 5).is_empty()
        );
    }
}

#[test]
fn report_serializes_no_match_as_null() {
    let targets = TargetSet::from_pairs([("four", 4.0), ("none", -1.0)]).unwrap();
    let filter = PlausibilityFilter::from(RangeFilter::positive());
    let report = find_best_matches(&xy(), &id_double(), &targets, &filter);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json[0]["target"], "four");
    assert_eq!(json[0]["result"]["transform"], "double");
    assert_eq!(json[0]["result"]["status"], "excellent");
    // Positive range still admits x = 2 for a negative target.
    assert_eq!(json[1]["result"]["derived"], 2.0);

    let rejecting = PlausibilityFilter::custom(|_| false);
    let report = find_best_matches(&xy(), &id_double(), &targets, &rejecting);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json[1]["target"], "none");
    assert!(json[0]["result"].is_null());
    assert!(json[1]["result"].is_null());
}

#[test]
fn default_search_matches_golden_fraction() {
    let engine = MatchEngine::from_options(&SearchOptions::default()).unwrap();
    let targets = TargetSet::from_pairs([
        ("fine_structure_constant", 0.007_297_352_569_3),
        ("weak_mixing_angle", 0.2229),
        ("pmns_theta23", 0.866),
    ])
    .unwrap();
    let report = engine.match_all(&targets);
    assert_eq!(report.len(), 3);
    assert_eq!(report.matched_count(), 3);
    for outcome in &report {
        let result = outcome.result.as_ref().unwrap();
        assert!(result.error < 0.01, "{}: {}", outcome.target, result.error);
        assert!(result.status >= MatchStatus::VeryGood);
    }
}

#[test]
fn scaling_preset_with_nuclear_range() {
    let options = SearchOptions {
        preset: TransformPreset::Scaling,
        plausibility: Some(RangeFilter::open_closed(0.0, 20.0)),
        thresholds: fit_model::ThresholdPreset::Coarse,
        ..SearchOptions::default()
    };
    let engine = MatchEngine::from_options(&options).unwrap();
    let best = engine.match_target(7.976).unwrap();
    assert!(best.derived > 0.0 && best.derived <= 20.0);
    assert!(best.error < 0.1);
}

fn arb_candidates() -> impl Strategy<Value = CandidateSet> {
    prop::collection::vec(-100.0f64..100.0, 0..12).prop_map(|values| {
        CandidateSet::from_reals(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (format!("c{i}"), v)),
        )
        .unwrap()
    })
}

fn grid_transforms() -> TransformSet {
    TransformSet::new()
        .with(Transform::scalar("x", |v| v))
        .and_then(|set| set.with(reciprocal()))
        .and_then(|set| set.with(Transform::scalar("x²", |v| v * v)))
        .and_then(|set| set.with(Transform::scalar("round(x)", f64::round)))
        .unwrap()
}

proptest! {
    #[test]
    fn search_is_deterministic(candidates in arb_candidates(), target in -50.0f64..50.0) {
        let transforms = grid_transforms();
        let first = find_best_match(&candidates, &transforms, target, &PlausibilityFilter::Any);
        let second = find_best_match(&candidates, &transforms, target, &PlausibilityFilter::Any);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn best_error_is_minimal(
        candidates in arb_candidates(),
        target in -50.0f64..50.0,
        max in 1.0f64..100.0,
    ) {
        let transforms = grid_transforms();
        let filter = PlausibilityFilter::from(RangeFilter::open_closed(0.0, max));
        let best = find_best_match(&candidates, &transforms, target, &filter);
        let mut any_plausible = false;
        for candidate in &candidates {
            for transform in &transforms {
                if let Ok(value) = transform.apply(&candidate.value)
                    && filter.accepts(value)
                {
                    any_plausible = true;
                    let best = best.as_ref().unwrap();
                    prop_assert!((value - target).abs() >= best.error);
                }
            }
        }
        prop_assert_eq!(any_plausible, best.is_some());
    }

    #[test]
    fn ranking_head_agrees_with_best(candidates in arb_candidates(), target in -50.0f64..50.0) {
        let transforms = grid_transforms();
        let best = find_best_match(&candidates, &transforms, target, &PlausibilityFilter::Any);
        let ranked = rank_for_target(&candidates, &transforms, target, &PlausibilityFilter::Any, 1);
        prop_assert_eq!(best, ranked.into_iter().next().map(|r| r.result));
    }

    #[test]
    fn earlier_pair_wins_ties(value in 0.5f64..50.0, copies in 2usize..6) {
        let candidates = CandidateSet::from_reals(
            (0..copies).map(|i| (format!("c{i}"), value)),
        ).unwrap();
        let best = find_best_match(&candidates, &grid_transforms(), value, &PlausibilityFilter::Any).unwrap();
        prop_assert_eq!(best.candidate.as_str(), "c0");
        prop_assert_eq!(best.transform.as_str(), "x");
    }

    #[test]
    fn targets_are_independent(candidates in arb_candidates(), a in -50.0f64..50.0, b in -50.0f64..50.0) {
        let transforms = grid_transforms();
        let targets = TargetSet::from_pairs([("A", a), ("B", b)]).unwrap();
        let report = find_best_matches(&candidates, &transforms, &targets, &PlausibilityFilter::Any);
        let alone_a = find_best_match(&candidates, &transforms, a, &PlausibilityFilter::Any);
        let alone_b = find_best_match(&candidates, &transforms, b, &PlausibilityFilter::Any);
        prop_assert_eq!(report.get("A").and_then(|o| o.result.clone()), alone_a);
        prop_assert_eq!(report.get("B").and_then(|o| o.result.clone()), alone_b);
    }
}
