//! Numeric constants shared by the search crates.

/// Curvature of the curved arithmetic and default seed of the generated levels.
pub const CURVATURE: f64 = 0.893_469_101_829_281_2;

/// Golden ratio `(1 + √5) / 2`.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Input magnitude at which the calculator switches to the complex regime.
pub const QUANTUM_BOUNDARY: f64 = 0.5599;

/// Imaginary parts at or below this are treated as zero.
pub const IMAGINARY_EPSILON: f64 = 1e-10;
