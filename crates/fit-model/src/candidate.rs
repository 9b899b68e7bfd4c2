//! Candidate values fed into the search grid.
//!
//! A candidate is one named numeric input. Candidates derived from a complex
//! level carry an explicit [`CandidateKind`] tag set at construction time, so
//! callers never have to recover the category from the candidate's name.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Numeric value of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Real(f64),
    Complex(Complex64),
}

impl Scalar {
    /// Operand handed to scalar transformations.
    ///
    /// Real values pass through unchanged; complex values are reduced to
    /// their magnitude.
    #[must_use]
    pub fn scalar_operand(&self) -> f64 {
        match self {
            Self::Real(value) => *value,
            Self::Complex(value) => value.norm(),
        }
    }

    /// Operand handed to complex-aware transformations.
    #[must_use]
    pub fn as_complex(&self) -> Complex64 {
        match self {
            Self::Real(value) => Complex64::new(*value, 0.0),
            Self::Complex(value) => *value,
        }
    }

    #[must_use]
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<Complex64> for Scalar {
    fn from(value: Complex64) -> Self {
        Self::Complex(value)
    }
}

/// Category of a candidate.
///
/// Parts taken from a complex level are stored as absolute values, so every
/// derived kind except [`CandidateKind::Complex`] is a non-negative real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// Member of a generated real sequence.
    Seed,
    /// Value read from a literal table.
    Literal,
    /// A complex level kept whole.
    Complex,
    RealPart,
    ImaginaryPart,
    /// `|re| + |im|`.
    Sum,
    Magnitude,
    /// `|re| * |im|`.
    Product,
    InverseReal,
    InverseImaginary,
    RealPower(u8),
    ImaginaryPower(u8),
    MagnitudePower(u8),
}

/// Coarse grouping used when summarising which kind of level won a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelType {
    Original,
    Real,
    Imaginary,
    Complex,
}

impl LevelType {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "ORIGINAL",
            Self::Real => "REAL",
            Self::Imaginary => "IMAGINARY",
            Self::Complex => "COMPLEX",
        }
    }
}

impl CandidateKind {
    #[must_use]
    pub fn level_type(&self) -> LevelType {
        match self {
            Self::Seed | Self::Literal => LevelType::Original,
            Self::RealPart | Self::InverseReal | Self::RealPower(_) => LevelType::Real,
            Self::ImaginaryPart | Self::InverseImaginary | Self::ImaginaryPower(_) => {
                LevelType::Imaginary
            }
            Self::Complex
            | Self::Sum
            | Self::Magnitude
            | Self::Product
            | Self::MagnitudePower(_) => LevelType::Complex,
        }
    }

    /// Name suffix appended to the level name for derived candidates.
    ///
    /// Returns `None` for kinds that are named after the level itself.
    #[must_use]
    pub fn suffix(&self) -> Option<String> {
        let suffix = match self {
            Self::Seed | Self::Literal | Self::Complex => return None,
            Self::RealPart => "real".to_string(),
            Self::ImaginaryPart => "imag".to_string(),
            Self::Sum => "sum".to_string(),
            Self::Magnitude => "mag".to_string(),
            Self::Product => "prod".to_string(),
            Self::InverseReal => "inv_real".to_string(),
            Self::InverseImaginary => "inv_imag".to_string(),
            Self::RealPower(power) => format!("real_p{power}"),
            Self::ImaginaryPower(power) => format!("imag_p{power}"),
            Self::MagnitudePower(power) => format!("mag_p{power}"),
        };
        Some(suffix)
    }
}

impl std::str::FromStr for CandidateKind {
    type Err = ModelError;

    /// Parses `seed`, `literal`, `complex` or any [`CandidateKind::suffix`].
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        let kind = match s.as_str() {
            "" | "literal" => Self::Literal,
            "seed" => Self::Seed,
            "complex" => Self::Complex,
            "real" => Self::RealPart,
            "imag" => Self::ImaginaryPart,
            "sum" => Self::Sum,
            "mag" => Self::Magnitude,
            "prod" => Self::Product,
            "inv_real" => Self::InverseReal,
            "inv_imag" => Self::InverseImaginary,
            other => {
                let power = |prefix: &str| other.strip_prefix(prefix)?.parse::<u8>().ok();
                if let Some(p) = power("real_p") {
                    Self::RealPower(p)
                } else if let Some(p) = power("imag_p") {
                    Self::ImaginaryPower(p)
                } else if let Some(p) = power("mag_p") {
                    Self::MagnitudePower(p)
                } else {
                    return Err(ModelError::UnknownKind(other.to_string()));
                }
            }
        };
        Ok(kind)
    }
}

/// One named numeric input to the search grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub value: Scalar,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn new(name: impl Into<String>, value: impl Into<Scalar>, kind: CandidateKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Ordered, uniquely named collection of candidates.
///
/// Insertion order is the iteration order of the search, which makes the
/// tie-break between equally good pairs deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candidate>", into = "Vec<Candidate>")]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set of [`CandidateKind::Literal`] real candidates.
    pub fn from_reals<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (name, value) in values {
            set.push(Candidate::new(name, value, CandidateKind::Literal))?;
        }
        Ok(set)
    }

    pub fn push(&mut self, candidate: Candidate) -> Result<()> {
        if candidate.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.get(&candidate.name).is_some() {
            return Err(ModelError::DuplicateName(candidate.name));
        }
        self.candidates.push(candidate);
        Ok(())
    }

    /// Builder-style variant of [`Self::push`].
    pub fn with(
        mut self,
        name: impl Into<String>,
        value: impl Into<Scalar>,
        kind: CandidateKind,
    ) -> Result<Self> {
        self.push(Candidate::new(name, value, kind))?;
        Ok(self)
    }

    /// Appends every candidate of `other`, keeping its order.
    pub fn extend_from(&mut self, other: CandidateSet) -> Result<()> {
        for candidate in other.candidates {
            self.push(candidate)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.name.as_str())
    }
}

impl TryFrom<Vec<Candidate>> for CandidateSet {
    type Error = ModelError;

    fn try_from(candidates: Vec<Candidate>) -> Result<Self> {
        let mut set = Self::new();
        for candidate in candidates {
            set.push(candidate)?;
        }
        Ok(set)
    }
}

impl From<CandidateSet> for Vec<Candidate> {
    fn from(set: CandidateSet) -> Self {
        set.candidates
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
