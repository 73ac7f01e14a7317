//! # Probability
//!
//! A validated probability value in `[0, 1]`, used by alterers and by the engine's
//! survivor/offspring fractions.

use std::fmt;

use crate::error::{GeneticError, Result};

/// A probability in the closed interval `[0, 1]`.
///
/// Serialized as a plain number; deserialization is validated like [`Probability::new`].
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    pub const ZERO: Probability = Probability(0.0);
    pub const ONE: Probability = Probability(1.0);

    /// Creates a new probability.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `value` is not a finite number in `[0, 1]`.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(GeneticError::Configuration(format!(
                "Probability must be in the range [0, 1], but was {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// For constants known to be in `[0, 1]`.
    pub(crate) const fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = GeneticError;

    fn try_from(value: f64) -> Result<Self> {
        Probability::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
