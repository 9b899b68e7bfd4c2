//! Named transformations applied to every candidate.
//!
//! A [`Transform`] wraps one of three operations:
//!
//! - a scalar function of the candidate's real operand (complex candidates
//!   are reduced to their magnitude first),
//! - a complex-aware function that receives the candidate as [`Complex64`],
//! - a constant that ignores the candidate entirely.
//!
//! Every evaluation is checked for finiteness, so a transformation that
//! overflows or leaves its domain reports an [`EvalError`] instead of
//! producing a value.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use fit_model::constants::GOLDEN_RATIO;
use fit_model::{ModelError, Scalar, TransformPreset};
use num_complex::Complex64;

use crate::error::EvalError;

type ScalarFn = dyn Fn(f64) -> Result<f64, EvalError> + Send + Sync;
type ComplexFn = dyn Fn(Complex64) -> Result<f64, EvalError> + Send + Sync;

#[derive(Clone)]
enum Operation {
    Scalar(Arc<ScalarFn>),
    Complex(Arc<ComplexFn>),
    Constant(f64),
}

/// How a transformation consumes its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandMode {
    Scalar,
    ComplexAware,
    Constant,
}

#[derive(Clone)]
pub struct Transform {
    name: String,
    operation: Operation,
}

impl Transform {
    /// Infallible scalar transformation. Non-finite results still fail.
    pub fn scalar<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::fallible(name, move |x| Ok(f(x)))
    }

    pub fn fallible<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(f64) -> Result<f64, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            operation: Operation::Scalar(Arc::new(f)),
        }
    }

    pub fn complex<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Complex64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            operation: Operation::Complex(Arc::new(move |z| Ok(f(z)))),
        }
    }

    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            operation: Operation::Constant(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> OperandMode {
        match self.operation {
            Operation::Scalar(_) => OperandMode::Scalar,
            Operation::Complex(_) => OperandMode::ComplexAware,
            Operation::Constant(_) => OperandMode::Constant,
        }
    }

    /// Evaluates the transformation on one candidate value.
    pub fn apply(&self, value: &Scalar) -> Result<f64, EvalError> {
        let derived = match &self.operation {
            Operation::Scalar(f) => f(value.scalar_operand())?,
            Operation::Complex(f) => f(value.as_complex())?,
            Operation::Constant(c) => *c,
        };
        if derived.is_finite() {
            Ok(derived)
        } else {
            Err(EvalError::NonFinite(derived))
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name)
            .field("mode", &self.mode())
            .finish()
    }
}

/// Ordered, uniquely named collection of transformations.
#[derive(Debug, Clone, Default)]
pub struct TransformSet {
    transforms: Vec<Transform>,
}

impl TransformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: TransformPreset) -> Self {
        let transforms = match preset {
            TransformPreset::Golden => golden(),
            TransformPreset::Scaling => scaling(),
            TransformPreset::Extended => extended(),
        };
        Self { transforms }
    }

    pub fn push(&mut self, transform: Transform) -> Result<(), ModelError> {
        if transform.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.get(&transform.name).is_some() {
            return Err(ModelError::DuplicateName(transform.name));
        }
        self.transforms.push(transform);
        Ok(())
    }

    pub fn with(mut self, transform: Transform) -> Result<Self, ModelError> {
        self.push(transform)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.transforms.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transform> {
        self.transforms.iter()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransformSet {
    type Item = &'a Transform;
    type IntoIter = std::slice::Iter<'a, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.transforms.iter()
    }
}

/// Replaces each standalone `x` in a transformation name with `candidate`.
///
/// An `x` is standalone when neither neighbour is an ASCII letter, so
/// `exp(10x)` becomes `exp(10L3)` while the `x` in `exp` is untouched.
pub fn render_formula(name: &str, candidate: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut rendered = String::with_capacity(name.len() + candidate.len());
    for (i, &c) in chars.iter().enumerate() {
        let before = i.checked_sub(1).and_then(|j| chars.get(j));
        let after = chars.get(i + 1);
        let is_letter = |n: Option<&char>| n.is_some_and(char::is_ascii_alphabetic);
        if c == 'x' && !is_letter(before) && !is_letter(after) {
            rendered.push_str(candidate);
        } else {
            rendered.push(c);
        }
    }
    rendered
}

fn superscript(n: u32) -> String {
    n.to_string()
        .chars()
        .map(|d| match d {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            _ => '⁹',
        })
        .collect()
}

fn power_label(symbol: &str, n: u32) -> String {
    if n == 1 {
        symbol.to_string()
    } else {
        format!("{symbol}{}", superscript(n))
    }
}

pub fn identity() -> Transform {
    Transform::scalar("x", |x| x)
}

/// `1/x`; a zero operand fails with [`EvalError::DivisionByZero`].
pub fn reciprocal() -> Transform {
    Transform::fallible("1/x", |x| {
        if x == 0.0 {
            Err(EvalError::DivisionByZero)
        } else {
            Ok(1.0 / x)
        }
    })
}

/// `1/x` returning `sentinel` for a zero operand.
pub fn guarded_reciprocal(sentinel: f64) -> Transform {
    Transform::scalar("1/x", move |x| if x == 0.0 { sentinel } else { 1.0 / x })
}

pub fn power(k: u32) -> Transform {
    let exponent = i32::try_from(k).unwrap_or(i32::MAX);
    Transform::scalar(format!("x{}", superscript(k)), move |x| x.powi(exponent))
}

/// `√x`; negative operands fail.
pub fn sqrt() -> Transform {
    Transform::fallible("√x", |x| {
        if x < 0.0 {
            Err(EvalError::Domain {
                operand: x,
                reason: "square root of a negative number",
            })
        } else {
            Ok(x.sqrt())
        }
    })
}

pub fn sin() -> Transform {
    Transform::scalar("sin(x)", f64::sin)
}

/// `x × factor`, named `x×{label}`.
pub fn scale(label: &str, factor: f64) -> Transform {
    Transform::scalar(format!("x×{label}"), move |x| x * factor)
}

/// `x / divisor`, named `x/{label}`.
pub fn divide(label: &str, divisor: f64) -> Transform {
    Transform::scalar(format!("x/{label}"), move |x| x / divisor)
}

pub fn exp_scaled(k: u32) -> Transform {
    let factor = f64::from(k);
    Transform::scalar(format!("exp({k}x)"), move |x| (factor * x).exp())
}

fn phi_pow(n: u32) -> f64 {
    GOLDEN_RATIO.powi(i32::try_from(n).unwrap_or(i32::MAX))
}

fn pi_pow(n: u32) -> f64 {
    PI.powi(i32::try_from(n).unwrap_or(i32::MAX))
}

/// Constant golden fractions `1/φ … 1/φ⁴`, `2/φ`, `3/φ`, `φ/2 … φ/4`.
pub fn golden_constants() -> Vec<Transform> {
    let mut constants: Vec<Transform> = (1..=4)
        .map(|n| Transform::constant(format!("1/{}", power_label("φ", n)), 1.0 / phi_pow(n)))
        .collect();
    constants.push(Transform::constant("2/φ", 2.0 / GOLDEN_RATIO));
    constants.push(Transform::constant("3/φ", 3.0 / GOLDEN_RATIO));
    for d in 2..=4 {
        constants.push(Transform::constant(
            format!("φ/{d}"),
            GOLDEN_RATIO / f64::from(d),
        ));
    }
    constants
}

fn golden() -> Vec<Transform> {
    let mut transforms: Vec<Transform> = (1..=10)
        .map(|n| divide(&power_label("φ", n), phi_pow(n)))
        .collect();
    transforms.push(sin());
    transforms.extend((1..=3).map(|n| scale(&power_label("φ", n), phi_pow(n))));
    transforms.push(Transform::scalar("sin(π×x/φ)", |x| {
        (PI * x / GOLDEN_RATIO).sin()
    }));
    transforms.push(divide("π", PI));
    transforms.extend(golden_constants());
    transforms
}

fn scaling() -> Vec<Transform> {
    let mut transforms = vec![
        identity(),
        guarded_reciprocal(1e20),
        power(2),
        power(3),
        sqrt(),
    ];
    transforms.extend((1..=5).map(|n| scale(&power_label("φ", n), phi_pow(n))));
    transforms.push(scale("π", PI));
    transforms.push(scale("π²", pi_pow(2)));
    transforms.push(scale("φ×π", GOLDEN_RATIO * PI));
    transforms.push(Transform::scalar("x²×φ", |x| x.powi(2) * GOLDEN_RATIO));
    transforms.push(Transform::scalar("x³×φ", |x| x.powi(3) * GOLDEN_RATIO));
    transforms
}

fn extended() -> Vec<Transform> {
    let mut transforms: Vec<Transform> = [10, 12, 15, 20].into_iter().map(power).collect();
    transforms.extend(
        [10, 12, 15, 20]
            .into_iter()
            .map(|n| scale(&power_label("φ", n), phi_pow(n))),
    );
    transforms.extend((5..=8).map(|n| scale(&power_label("π", n), pi_pow(n))));
    for (p, q) in [(10, 5), (12, 6), (15, 7)] {
        let label = format!("{}×{}", power_label("φ", p), power_label("π", q));
        transforms.push(scale(&label, phi_pow(p) * pi_pow(q)));
    }
    transforms.extend([10, 12, 15].into_iter().map(exp_scaled));
    transforms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn reciprocal_of_zero_fails() {
        assert_eq!(
            reciprocal().apply(&Scalar::Real(0.0)),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(guarded_reciprocal(1e20).apply(&Scalar::Real(0.0)), Ok(1e20));
        assert_eq!(reciprocal().apply(&Scalar::Real(4.0)), Ok(0.25));
    }

    #[test]
    fn non_finite_results_fail() {
        let result = exp_scaled(15).apply(&Scalar::Real(100.0));
        assert!(matches!(result, Err(EvalError::NonFinite(_))));
        assert!(sqrt().apply(&Scalar::Real(-1.0)).is_err());
    }

    #[test]
    fn constant_ignores_operand() {
        let t = Transform::constant("φ/2", GOLDEN_RATIO / 2.0);
        assert_eq!(t.mode(), OperandMode::Constant);
        assert_eq!(t.apply(&Scalar::Real(123.0)), t.apply(&Scalar::Real(-7.0)));
    }

    #[test]
    fn scalar_transforms_see_magnitude_of_complex() {
        let value = Scalar::Complex(Complex64::new(3.0, 4.0));
        assert_eq!(identity().apply(&value), Ok(5.0));
        let imag = Transform::complex("im(x)", |z| z.im);
        assert_eq!(imag.apply(&value), Ok(4.0));
    }

    #[test]
    fn preset_names_are_unique() {
        for preset in [
            TransformPreset::Golden,
            TransformPreset::Scaling,
            TransformPreset::Extended,
        ] {
            let set = TransformSet::from_preset(preset);
            let mut names: Vec<&str> = set.iter().map(Transform::name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "{preset:?}");
        }
    }

    #[test]
    fn preset_sizes() {
        assert_eq!(TransformSet::from_preset(TransformPreset::Golden).len(), 25);
        assert_eq!(TransformSet::from_preset(TransformPreset::Scaling).len(), 15);
        assert_eq!(TransformSet::from_preset(TransformPreset::Extended).len(), 18);
    }

    #[test]
    fn golden_preset_values() {
        let set = TransformSet::from_preset(TransformPreset::Golden);
        let x = Scalar::Real(GOLDEN_RATIO.powi(2));
        let by_phi2 = set.get("x/φ²").map(|t| t.apply(&x));
        assert!(matches!(by_phi2, Some(Ok(v)) if close(v, 1.0)));
        let third = set.get("3/φ").map(|t| t.apply(&x));
        assert!(matches!(third, Some(Ok(v)) if close(v, 3.0 / GOLDEN_RATIO)));
    }

    #[test]
    fn duplicate_transform_names_are_rejected() {
        let set = TransformSet::new().with(identity()).unwrap();
        assert!(set.with(Transform::scalar("x", |x| x * 2.0)).is_err());
    }

    #[test]
    fn formula_rendering_replaces_standalone_x() {
        assert_eq!(render_formula("x/φ²", "L3"), "L3/φ²");
        assert_eq!(render_formula("exp(10x)", "L3"), "exp(10L3)");
        assert_eq!(render_formula("sin(π×x/φ)", "a"), "sin(π×a/φ)");
        assert_eq!(render_formula("1/φ", "a"), "1/φ");
    }
}
