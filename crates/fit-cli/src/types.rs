use fit_core::{CurvedOutcome, ProductOutcome};
use fit_match::{GridEntry, MatchReport, RankedPair, ToleranceHit};
use fit_model::{CandidateSet, GeneratingRule, StatusThresholds, TransformPreset};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MatchRun {
    pub preset: TransformPreset,
    pub candidate_count: usize,
    pub transform_count: usize,
    pub thresholds: StatusThresholds,
    pub outcomes: MatchReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rankings: Vec<TargetRanking>,
}

#[derive(Debug, Serialize)]
pub struct TargetRanking {
    pub target: String,
    pub target_value: f64,
    pub pairs: Vec<RankedPair>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "listing", rename_all = "snake_case")]
pub enum GridRun {
    Entries {
        entries: Vec<GridEntry>,
    },
    WithinTolerance {
        tolerance: f64,
        hits: Vec<ToleranceHit>,
    },
}

#[derive(Debug, Serialize)]
pub struct CurvedRun {
    pub a: f64,
    pub b: f64,
    pub curvature: f64,
    /// Inputs at or above this magnitude make the sum quantum.
    pub boundary: f64,
    pub classical_limit: f64,
    pub sum: CurvedOutcome,
    pub product: ProductOutcome,
    /// `a ⊕ b` as a tracked curved number.
    pub sum_display: String,
}

#[derive(Debug, Serialize)]
pub struct LevelsRun {
    pub seed: f64,
    pub rule: GeneratingRule,
    pub depth: usize,
    pub candidates: CandidateSet,
}
