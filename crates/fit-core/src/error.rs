use fit_model::ModelError;
use thiserror::Error;

/// Failure to evaluate one transformation on one operand.
///
/// The matcher treats every variant as "pair not applicable".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("operand {operand} is outside the domain: {reason}")]
    Domain { operand: f64, reason: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not finite: {0}")]
    NonFinite(f64),
}

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("seed {seed} is outside [-1, 1]; its arcsine is not real")]
    SeedOutOfDomain { seed: f64 },
    #[error("seed is not finite: {0}")]
    NonFiniteSeed(f64),
    #[error(transparent)]
    Model(#[from] ModelError),
}
