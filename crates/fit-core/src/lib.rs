//! Numeric building blocks for best-fit searches.
//!
//! - [`sequence`]: real recurrences and the complex arcsine ascent that
//!   produce candidate tables.
//! - [`transform`]: named transformations and the built-in presets.
//! - [`filter`]: plausibility predicates on transformed values.
//! - [`curved`]: curved addition and multiplication.

pub mod curved;
pub mod error;
pub mod filter;
pub mod sequence;
pub mod transform;

pub use curved::{
    CurvedNumber, CurvedOutcome, GeometricCalculator, PathOp, ProductOutcome, Regime,
    classical_limit, curved_add, curved_mul, first_quantum,
};
pub use error::{EvalError, SequenceError};
pub use filter::PlausibilityFilter;
pub use sequence::{ascend, ascent_levels, build_candidates, decompose, generate_levels};
pub use transform::{OperandMode, Transform, TransformSet, render_formula};
