//! Match results and their qualitative status.

use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateKind, LevelType};
use crate::error::{ModelError, Result};

/// Qualitative label for how close a match landed.
///
/// Ordered from worst to best so `status >= MatchStatus::Good` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At or beyond the `good` threshold.
    Close,
    /// Below the `good` threshold.
    Good,
    /// Below the `very_good` threshold.
    VeryGood,
    /// Below the `excellent` threshold.
    Excellent,
}

impl MatchStatus {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::VeryGood => "VERY GOOD",
            Self::Good => "GOOD",
            Self::Close => "CLOSE",
        }
    }
}

/// Which error measure the thresholds apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBasis {
    #[default]
    Absolute,
    /// `error / |target|`; falls back to the absolute error for a zero target.
    Relative,
}

/// Boundaries between [`MatchStatus`] levels.
///
/// - below `excellent`: [`MatchStatus::Excellent`]
/// - below `very_good`: [`MatchStatus::VeryGood`]
/// - below `good`: [`MatchStatus::Good`]
/// - otherwise: [`MatchStatus::Close`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub basis: ErrorBasis,
    pub excellent: f64,
    pub very_good: f64,
    pub good: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self::absolute()
    }
}

impl StatusThresholds {
    /// Absolute error: 0.001 / 0.01 / 0.1.
    #[must_use]
    pub fn absolute() -> Self {
        Self {
            basis: ErrorBasis::Absolute,
            excellent: 0.001,
            very_good: 0.01,
            good: 0.1,
        }
    }

    /// Absolute error for targets of order ten: 0.1 / 0.5 / 1.0.
    #[must_use]
    pub fn coarse_absolute() -> Self {
        Self {
            basis: ErrorBasis::Absolute,
            excellent: 0.1,
            very_good: 0.5,
            good: 1.0,
        }
    }

    /// Relative error: 0.1% / 1% / 10%.
    #[must_use]
    pub fn relative() -> Self {
        Self {
            basis: ErrorBasis::Relative,
            excellent: 0.001,
            very_good: 0.01,
            good: 0.1,
        }
    }

    /// Relative error in whole percent: 1% / 5% / 10%.
    #[must_use]
    pub fn percent() -> Self {
        Self {
            basis: ErrorBasis::Relative,
            excellent: 0.01,
            very_good: 0.05,
            good: 0.10,
        }
    }

    /// Checks that the thresholds are finite, positive and non-decreasing.
    pub fn validate(&self) -> Result<()> {
        let values = [self.excellent, self.very_good, self.good];
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ModelError::InvalidThresholds(format!(
                "thresholds must be finite and positive, got {values:?}"
            )));
        }
        if self.excellent > self.very_good || self.very_good > self.good {
            return Err(ModelError::InvalidThresholds(format!(
                "thresholds must be non-decreasing, got {values:?}"
            )));
        }
        Ok(())
    }

    /// Categorizes an error according to the configured basis.
    #[must_use]
    pub fn categorize(&self, error: f64, relative_error: Option<f64>) -> MatchStatus {
        let measure = match self.basis {
            ErrorBasis::Absolute => error,
            ErrorBasis::Relative => relative_error.unwrap_or(error),
        };
        if measure < self.excellent {
            MatchStatus::Excellent
        } else if measure < self.very_good {
            MatchStatus::VeryGood
        } else if measure < self.good {
            MatchStatus::Good
        } else {
            MatchStatus::Close
        }
    }
}

/// Named threshold presets, used by configuration files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPreset {
    #[default]
    Absolute,
    Coarse,
    Relative,
    Percent,
}

impl ThresholdPreset {
    #[must_use]
    pub fn thresholds(&self) -> StatusThresholds {
        match self {
            Self::Absolute => StatusThresholds::absolute(),
            Self::Coarse => StatusThresholds::coarse_absolute(),
            Self::Relative => StatusThresholds::relative(),
            Self::Percent => StatusThresholds::percent(),
        }
    }
}

/// Best (candidate, transformation) pair found for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate: String,
    pub candidate_kind: CandidateKind,
    pub transform: String,
    /// `transform(candidate)`.
    pub derived: f64,
    pub target: f64,
    /// `|derived - target|`.
    pub error: f64,
    /// `error / |target|`, absent for a zero target.
    pub relative_error: Option<f64>,
    pub status: MatchStatus,
}

impl MatchResult {
    #[must_use]
    pub fn level_type(&self) -> LevelType {
        self.candidate_kind.level_type()
    }
}

/// Relative error of `error` against `target`, or `None` for a zero target.
#[must_use]
pub fn relative_error(error: f64, target: f64) -> Option<f64> {
    if target == 0.0 {
        None
    } else {
        Some(error / target.abs())
    }
}
