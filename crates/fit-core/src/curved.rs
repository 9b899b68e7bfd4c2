//! Arithmetic on a curved number line.
//!
//! Curved addition and multiplication map the linear result through
//! `asin(κ · r)`. Once `|κ · r| > 1` the arcsine leaves the real line and the
//! result picks up an imaginary part, which is what [`Regime::Quantum`]
//! reports.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::ops::{Add, Mul};

use fit_model::GeneratingRule;
use fit_model::constants::{CURVATURE, IMAGINARY_EPSILON, QUANTUM_BOUNDARY};
use num_complex::Complex64;
use serde::Serialize;

use crate::sequence::generate_values;

/// Number of attractor levels the calculator compares energies against.
pub const ATTRACTOR_LEVELS: usize = 9;

/// Energies closer than this to an attractor's density snap to that level.
const ATTRACTOR_TOLERANCE: f64 = 0.1;

pub fn curved_add(a: Complex64, b: Complex64, curvature: f64) -> Complex64 {
    ((a + b) * curvature).asin()
}

pub fn curved_mul(a: Complex64, b: Complex64, curvature: f64) -> Complex64 {
    (a * b * curvature).asin()
}

/// Largest `x` whose curved self-sum `x ⊕ x` is still real.
pub fn classical_limit(curvature: f64) -> f64 {
    1.0 / (2.0 * curvature)
}

/// First point whose curved self-sum turns complex.
pub fn first_quantum(points: &[f64], curvature: f64) -> Option<f64> {
    points.iter().copied().find(|&x| {
        let z = Complex64::new(x, 0.0);
        Regime::of(curved_add(z, z, curvature)) == Regime::Quantum
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Classical,
    Quantum,
}

impl Regime {
    pub fn of(value: Complex64) -> Self {
        if value.im.abs() > IMAGINARY_EPSILON {
            Self::Quantum
        } else {
            Self::Classical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Classical => "CLASSICAL",
            Self::Quantum => "QUANTUM",
        }
    }
}

/// Operator recorded in a [`CurvedNumber`]'s path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp {
    Add,
    Mul,
}

impl PathOp {
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '⊕',
            Self::Mul => '⊗',
        }
    }
}

/// A value on the curved line together with the operations that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvedNumber {
    value: Complex64,
    curvature: f64,
    path: Vec<PathOp>,
}

impl CurvedNumber {
    pub fn new(value: f64) -> Self {
        Self::with_curvature(value, CURVATURE)
    }

    pub fn with_curvature(value: f64, curvature: f64) -> Self {
        Self::from_complex(Complex64::new(value, 0.0), curvature)
    }

    pub fn from_complex(value: Complex64, curvature: f64) -> Self {
        Self {
            value,
            curvature,
            path: Vec::new(),
        }
    }

    pub fn value(&self) -> Complex64 {
        self.value
    }

    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    pub fn path(&self) -> &[PathOp] {
        &self.path
    }

    /// Path rendered as operator symbols, e.g. `⊕⊗`.
    pub fn path_string(&self) -> String {
        self.path.iter().map(PathOp::symbol).collect()
    }

    pub fn real(&self) -> f64 {
        self.value.re
    }

    pub fn imag(&self) -> f64 {
        self.value.im
    }

    pub fn magnitude(&self) -> f64 {
        self.value.norm()
    }

    pub fn phase(&self) -> f64 {
        self.value.im.atan2(self.value.re)
    }

    pub fn regime(&self) -> Regime {
        Regime::of(self.value)
    }

    fn combine(self, op: PathOp, other: Self) -> Self {
        let value = match op {
            PathOp::Add => curved_add(self.value, other.value, self.curvature),
            PathOp::Mul => curved_mul(self.value, other.value, self.curvature),
        };
        let mut path = self.path;
        path.push(op);
        path.extend(other.path);
        Self {
            value,
            curvature: self.curvature,
            path,
        }
    }
}

impl Add for CurvedNumber {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.combine(PathOp::Add, other)
    }
}

impl Add<f64> for CurvedNumber {
    type Output = Self;

    fn add(self, other: f64) -> Self {
        let other = Self::with_curvature(other, self.curvature);
        self.combine(PathOp::Add, other)
    }
}

impl Mul for CurvedNumber {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.combine(PathOp::Mul, other)
    }
}

impl Mul<f64> for CurvedNumber {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        let other = Self::with_curvature(other, self.curvature);
        self.combine(PathOp::Mul, other)
    }
}

impl fmt::Display for CurvedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (re, im) = (self.real(), self.imag());
        match self.regime() {
            Regime::Classical => write!(f, "CurvedNumber({re:.10})"),
            Regime::Quantum if im < 0.0 => write!(f, "CurvedNumber({re:.10} - {:.10}i)", -im),
            Regime::Quantum => write!(f, "CurvedNumber({re:.10} + {im:.10}i)"),
        }
    }
}

/// Result of [`GeometricCalculator::add`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum CurvedOutcome {
    Classical {
        value: f64,
        energy: f64,
    },
    /// The real part is pinned to the `π/2` attractor.
    Quantum {
        real: f64,
        imaginary: f64,
        magnitude: f64,
        phase: f64,
        energy: f64,
    },
}

impl CurvedOutcome {
    pub fn regime(&self) -> Regime {
        match self {
            Self::Classical { .. } => Regime::Classical,
            Self::Quantum { .. } => Regime::Quantum,
        }
    }

    pub fn energy(&self) -> f64 {
        match self {
            Self::Classical { energy, .. } | Self::Quantum { energy, .. } => *energy,
        }
    }
}

/// Result of [`GeometricCalculator::multiply`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductOutcome {
    pub value: Complex64,
    pub regime: Regime,
    pub energy: f64,
    /// 1-based attractor level, `None` when no attractor is close enough.
    pub level: Option<usize>,
}

/// Curved calculator with a regime boundary on its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricCalculator {
    curvature: f64,
    boundary: f64,
    attractors: Vec<f64>,
}

impl Default for GeometricCalculator {
    fn default() -> Self {
        Self::new(CURVATURE, QUANTUM_BOUNDARY)
    }
}

impl GeometricCalculator {
    /// Attractors follow `x ← sin x + e^(−x)` from the curvature.
    pub fn new(curvature: f64, boundary: f64) -> Self {
        Self {
            curvature,
            boundary,
            attractors: generate_values(curvature, GeneratingRule::SineExp, ATTRACTOR_LEVELS),
        }
    }

    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    pub fn boundary(&self) -> f64 {
        self.boundary
    }

    pub fn attractors(&self) -> &[f64] {
        &self.attractors
    }

    /// `asin(κ · frac(|x|))`.
    pub fn energy_pattern(&self, x: f64) -> f64 {
        (self.curvature * (x - x.trunc()).abs()).asin()
    }

    /// Energy density `e^(−a) / a` of the 1-based attractor `level`.
    pub fn attractor_density(&self, level: usize) -> Option<f64> {
        let attractor = *self.attractors.get(level.checked_sub(1)?)?;
        Some((-attractor).exp() / attractor)
    }

    /// First attractor level whose density is within tolerance of `energy`.
    pub fn nearest_attractor(&self, energy: f64) -> Option<usize> {
        (1..=self.attractors.len()).find(|&level| {
            self.attractor_density(level)
                .is_some_and(|density| (energy - density).abs() < ATTRACTOR_TOLERANCE)
        })
    }

    /// `sin(κx) · sin(κy) · sin(κz)`.
    pub fn wave_amplitude(&self, [x, y, z]: [f64; 3]) -> f64 {
        (self.curvature * x).sin() * (self.curvature * y).sin() * (self.curvature * z).sin()
    }

    /// `exp(−density / boundary)`.
    pub fn time_dilation(&self, energy_density: f64) -> f64 {
        (-energy_density / self.boundary).exp()
    }

    /// Quantum when either input reaches the boundary or the sum itself
    /// leaves the real line.
    pub fn add(&self, a: f64, b: f64) -> CurvedOutcome {
        let sum = curved_add(
            Complex64::new(a, 0.0),
            Complex64::new(b, 0.0),
            self.curvature,
        );
        if a.abs().max(b.abs()) >= self.boundary || Regime::of(sum) == Regime::Quantum {
            let magnitude = sum.norm();
            CurvedOutcome::Quantum {
                real: FRAC_PI_2,
                imaginary: sum.im,
                magnitude,
                phase: sum.im.atan2(FRAC_PI_2),
                energy: self.energy_pattern(magnitude),
            }
        } else {
            CurvedOutcome::Classical {
                value: sum.re,
                energy: self.energy_pattern(sum.re),
            }
        }
    }

    pub fn multiply(&self, a: f64, b: f64) -> ProductOutcome {
        let value = curved_mul(
            Complex64::new(a, 0.0),
            Complex64::new(b, 0.0),
            self.curvature,
        );
        let regime = Regime::of(value);
        let energy = match regime {
            Regime::Classical => self.energy_pattern(value.re),
            Regime::Quantum => self.energy_pattern(value.norm()),
        };
        ProductOutcome {
            value,
            regime,
            energy,
            level: self.nearest_attractor(energy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_plus_one_is_complex() {
        let two = CurvedNumber::new(1.0) + 1.0;
        assert_eq!(two.regime(), Regime::Quantum);
        assert!((two.real() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(two.path(), &[PathOp::Add]);
    }

    #[test]
    fn small_sums_stay_real() {
        let sum = CurvedNumber::new(0.1) + CurvedNumber::new(0.2);
        assert_eq!(sum.regime(), Regime::Classical);
        assert!((sum.real() - (CURVATURE * 0.3).asin()).abs() < 1e-12);
        assert_eq!(sum.to_string(), format!("CurvedNumber({:.10})", sum.real()));
    }

    #[test]
    fn path_concatenates_operands() {
        let left = CurvedNumber::new(0.1) * 0.2;
        let right = CurvedNumber::new(0.3) + 0.1;
        let combined = left + right;
        assert_eq!(combined.path_string(), "⊗⊕⊕");
    }

    #[test]
    fn classical_limit_separates_regimes() {
        let limit = classical_limit(CURVATURE);
        let points: Vec<f64> = (0..100).map(|i| 0.5 + f64::from(i) * 0.001).collect();
        let first = first_quantum(&points, CURVATURE).unwrap();
        assert!(first > limit);
        assert!(first - limit < 0.002);
    }

    #[test]
    fn calculator_switches_at_boundary() {
        let calc = GeometricCalculator::default();
        let classical = calc.add(0.2, 0.3);
        assert_eq!(classical.regime(), Regime::Classical);

        let quantum = calc.add(0.6, 0.6);
        match quantum {
            CurvedOutcome::Quantum {
                real, imaginary, ..
            } => {
                assert_eq!(real, FRAC_PI_2);
                assert!(imaginary.abs() > 0.0);
            }
            CurvedOutcome::Classical { .. } => panic!("expected quantum outcome"),
        }
    }

    #[test]
    fn complex_sum_below_boundary_is_quantum() {
        let calc = GeometricCalculator::default();
        let raw = curved_add(
            Complex64::new(0.5598, 0.0),
            Complex64::new(0.5598, 0.0),
            CURVATURE,
        );
        assert_eq!(Regime::of(raw), Regime::Quantum);

        match calc.add(0.5598, 0.5598) {
            CurvedOutcome::Quantum {
                imaginary,
                magnitude,
                ..
            } => {
                assert_eq!(imaginary, raw.im);
                assert_eq!(magnitude, raw.norm());
            }
            CurvedOutcome::Classical { .. } => panic!("expected quantum outcome"),
        }
    }

    #[test]
    fn energy_pattern_uses_fractional_part() {
        let calc = GeometricCalculator::default();
        assert_eq!(calc.energy_pattern(3.0), 0.0);
        assert_eq!(calc.energy_pattern(-1.25), calc.energy_pattern(0.25));
    }

    #[test]
    fn attractors_start_at_curvature() {
        let calc = GeometricCalculator::default();
        assert_eq!(calc.attractors().len(), ATTRACTOR_LEVELS);
        assert_eq!(calc.attractors()[0], CURVATURE);
        assert_eq!(calc.attractor_density(0), None);
        assert_eq!(calc.attractor_density(10), None);
        let density = calc.attractor_density(1).unwrap();
        assert_eq!(calc.nearest_attractor(density), Some(1));
        assert_eq!(calc.nearest_attractor(100.0), None);
    }
}
