use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("target '{name}' has a non-finite value: {value}")]
    NonFiniteTarget { name: String, value: f64 },
    #[error("invalid status thresholds: {0}")]
    InvalidThresholds(String),
    #[error("unknown candidate kind: {0}")]
    UnknownKind(String),
    #[error("invalid plausibility range: {0}")]
    InvalidRange(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
