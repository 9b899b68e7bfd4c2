//! Reference values the search tries to approximate.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub value: f64,
    /// Unit of the reference value, for display only.
    #[serde(default)]
    pub unit: Option<String>,
    /// Free-form grouping label (e.g. "leptons", "cosmology").
    #[serde(default)]
    pub group: Option<String>,
}

impl Target {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: None,
            group: None,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Ordered, uniquely named collection of targets with finite values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Target>", into = "Vec<Target>")]
pub struct TargetSet {
    targets: Vec<Target>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, value) in values {
            set.push(Target::new(name, value))?;
        }
        Ok(set)
    }

    pub fn push(&mut self, target: Target) -> Result<()> {
        if target.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if !target.value.is_finite() {
            return Err(ModelError::NonFiniteTarget {
                name: target.name,
                value: target.value,
            });
        }
        if self.get(&target.name).is_some() {
            return Err(ModelError::DuplicateName(target.name));
        }
        self.targets.push(target);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Keeps only the targets in the given group (case-insensitive).
    #[must_use]
    pub fn filter_group(&self, group: &str) -> Self {
        Self {
            targets: self
                .targets
                .iter()
                .filter(|t| {
                    t.group
                        .as_deref()
                        .is_some_and(|g| g.eq_ignore_ascii_case(group))
                })
                .cloned()
                .collect(),
        }
    }
}

impl TryFrom<Vec<Target>> for TargetSet {
    type Error = ModelError;

    fn try_from(targets: Vec<Target>) -> Result<Self> {
        let mut set = Self::new();
        for target in targets {
            set.push(target)?;
        }
        Ok(set)
    }
}

impl From<TargetSet> for Vec<Target> {
    fn from(set: TargetSet) -> Self {
        set.targets
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}
