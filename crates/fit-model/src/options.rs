//! Configuration options for a search run.
//!
//! Every struct here deserializes from a partial TOML document; missing
//! fields fall back to [`Default`].

use serde::{Deserialize, Serialize};

use crate::constants::CURVATURE;
use crate::error::{ModelError, Result};
use crate::result::ThresholdPreset;

/// Recurrence used to generate the real seed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratingRule {
    /// `x <- sin(x)`.
    #[default]
    Sine,
    /// `x <- sin(x) + exp(-x)`.
    SineExp,
}

/// Built-in transformation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformPreset {
    /// Golden-ratio divisions and scalings plus constant golden fractions.
    #[default]
    Golden,
    /// Low powers, reciprocal and φ/π scalings for targets up to ~20.
    Scaling,
    /// High powers and exponentials for large targets.
    Extended,
}

/// Range predicate on a transformed value.
///
/// `None` bounds are unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub min_inclusive: bool,
    pub max: Option<f64>,
    pub max_inclusive: bool,
}

impl RangeFilter {
    /// `(min, max]`
    #[must_use]
    pub fn open_closed(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            min_inclusive: false,
            max: Some(max),
            max_inclusive: true,
        }
    }

    /// `[min, max]`
    #[must_use]
    pub fn closed(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            min_inclusive: true,
            max: Some(max),
            max_inclusive: true,
        }
    }

    /// `(0, +inf)`
    #[must_use]
    pub fn positive() -> Self {
        Self {
            min: Some(0.0),
            min_inclusive: false,
            max: None,
            max_inclusive: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if bound.is_nan() {
                return Err(ModelError::InvalidRange("bound is NaN".to_string()));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(ModelError::InvalidRange(format!(
                "min {min} is greater than max {max}"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above_min = match self.min {
            Some(min) if self.min_inclusive => value >= min,
            Some(min) => value > min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_inclusive => value <= max,
            Some(max) => value < max,
            None => true,
        };
        above_min && below_max
    }
}

/// How each complex ascent level is decomposed into candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AscentOptions {
    /// Number of complex arcsine steps.
    pub depth: usize,
    /// Keep the complex level itself as a candidate.
    pub include_complex: bool,
    pub include_product: bool,
    pub include_inverses: bool,
    /// Exponents applied to the real and imaginary parts.
    pub powers: Vec<u8>,
    /// Also apply `powers` to the magnitude.
    pub magnitude_powers: bool,
}

impl Default for AscentOptions {
    fn default() -> Self {
        Self {
            depth: 14,
            include_complex: false,
            include_product: true,
            include_inverses: true,
            powers: vec![2, 3, 4],
            magnitude_powers: false,
        }
    }
}

/// Options for one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub seed: f64,
    pub rule: GeneratingRule,
    /// Number of real levels, seed included.
    pub level_count: usize,
    /// Name prefix of generated levels (`{prefix}{n}`, `{prefix}-{n}`).
    pub level_prefix: String,
    pub ascent: AscentOptions,
    pub preset: TransformPreset,
    pub plausibility: Option<RangeFilter>,
    pub thresholds: ThresholdPreset,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            seed: CURVATURE,
            rule: GeneratingRule::Sine,
            level_count: 46,
            level_prefix: "L".to_string(),
            ascent: AscentOptions::default(),
            preset: TransformPreset::Golden,
            plausibility: None,
            thresholds: ThresholdPreset::Absolute,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.level_prefix.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if let Some(range) = &self.plausibility {
            range.validate()?;
        }
        self.thresholds.thresholds().validate()
    }
}
