//! Plausibility predicate applied to every transformed value.

use std::fmt;
use std::sync::Arc;

use fit_model::RangeFilter;

type Predicate = dyn Fn(f64) -> bool + Send + Sync;

/// Decides whether a derived value may be considered at all.
#[derive(Clone, Default)]
pub enum PlausibilityFilter {
    #[default]
    Any,
    Range(RangeFilter),
    Custom(Arc<Predicate>),
}

impl PlausibilityFilter {
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(predicate))
    }

    pub fn accepts(&self, value: f64) -> bool {
        match self {
            Self::Any => true,
            Self::Range(range) => range.accepts(value),
            Self::Custom(predicate) => predicate(value),
        }
    }
}

impl From<RangeFilter> for PlausibilityFilter {
    fn from(range: RangeFilter) -> Self {
        Self::Range(range)
    }
}

impl From<Option<RangeFilter>> for PlausibilityFilter {
    fn from(range: Option<RangeFilter>) -> Self {
        range.map_or(Self::Any, Self::Range)
    }
}

impl fmt::Debug for PlausibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Range(range) => f.debug_tuple("Range").field(range).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
