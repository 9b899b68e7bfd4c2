//! Data model for best-fit grid searches.

pub mod candidate;
pub mod constants;
pub mod error;
pub mod options;
pub mod result;
pub mod target;

pub use candidate::{Candidate, CandidateKind, CandidateSet, LevelType, Scalar};
pub use error::{ModelError, Result};
pub use options::{AscentOptions, GeneratingRule, RangeFilter, SearchOptions, TransformPreset};
pub use result::{
    ErrorBasis, MatchResult, MatchStatus, StatusThresholds, ThresholdPreset, relative_error,
};
pub use target::{Target, TargetSet};
