//! Per-target outcomes of a search run and summary statistics over them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use fit_model::{LevelType, MatchResult, MatchStatus};
use serde::{Deserialize, Serialize};

/// Outcome for one target. `result` is `None` when no pair was plausible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub target: String,
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub result: Option<MatchResult>,
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        self.result.is_some()
    }

    pub fn error(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.error)
    }
}

/// Outcomes of [`crate::find_best_matches`] in target order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchReport {
    outcomes: Vec<MatchOutcome>,
}

impl MatchReport {
    pub fn new(outcomes: Vec<MatchOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[MatchOutcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchOutcome> {
        self.outcomes.iter()
    }

    pub fn get(&self, target: &str) -> Option<&MatchOutcome> {
        self.outcomes.iter().find(|o| o.target == target)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn results(&self) -> impl Iterator<Item = &MatchResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref())
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.results().count()
    }

    /// Names of the targets without a plausible match.
    #[must_use]
    pub fn unmatched(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_none())
            .map(|o| o.target.as_str())
            .collect()
    }

    #[must_use]
    pub fn count_by_status(&self) -> BTreeMap<MatchStatus, usize> {
        let mut counts = BTreeMap::new();
        for result in self.results() {
            *counts.entry(result.status).or_insert(0) += 1;
        }
        counts
    }

    /// Counts matches by the level type of the winning candidate.
    #[must_use]
    pub fn count_by_level_type(&self) -> BTreeMap<LevelType, usize> {
        let mut counts = BTreeMap::new();
        for result in self.results() {
            *counts.entry(result.level_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Outcomes whose status is at least `min_status`.
    #[must_use]
    pub fn filter_by_status(&self, min_status: MatchStatus) -> Vec<&MatchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.result.as_ref().is_some_and(|r| r.status >= min_status))
            .collect()
    }

    #[must_use]
    pub fn mean_error(&self) -> Option<f64> {
        let matched = self.matched_count();
        if matched == 0 {
            return None;
        }
        let sum: f64 = self.results().map(|r| r.error).sum();
        Some(sum / matched as f64)
    }

    #[must_use]
    pub fn max_error(&self) -> Option<f64> {
        self.results()
            .map(|r| r.error)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// Matched outcome with the smallest error; the first one wins ties.
    #[must_use]
    pub fn best(&self) -> Option<&MatchOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.is_match())
            .min_by(|a, b| compare_errors(a, b))
    }

    /// Outcomes ordered by error, no-match outcomes last, ties in target order.
    #[must_use]
    pub fn sorted_by_error(&self) -> Vec<&MatchOutcome> {
        let mut sorted: Vec<&MatchOutcome> = self.outcomes.iter().collect();
        sorted.sort_by(|a, b| compare_errors(a, b));
        sorted
    }
}

fn compare_errors(a: &MatchOutcome, b: &MatchOutcome) -> Ordering {
    match (a.error(), b.error()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl<'a> IntoIterator for &'a MatchReport {
    type Item = &'a MatchOutcome;
    type IntoIter = std::slice::Iter<'a, MatchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
