use super::probability::ProbabilitySelector;
use crate::error::{GeneticError, Result};

/// Linear ranking selection.
///
/// The population is sorted best first and individual of rank `r` (0 is the best)
/// is selected with probability
///
/// ```text
/// p(r) = (n+ - (n+ - n-) * r / (N - 1)) / N,    n+ = 2 - n-
/// ```
///
/// `n- / N` is the probability of the worst individual, `n+ / N` the one of the best.
/// With `n- = 1` the selection is uniform; smaller values increase the selection
/// pressure.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinearRankConfig")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRankSelector {
    n_minus: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LinearRankConfig {
    n_minus: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<LinearRankConfig> for LinearRankSelector {
    type Error = GeneticError;

    fn try_from(config: LinearRankConfig) -> Result<Self> {
        Self::new(config.n_minus)
    }
}

impl LinearRankSelector {
    /// # Errors
    ///
    /// Returns an error if `n_minus` is not in `[0, 1]`.
    pub fn new(n_minus: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&n_minus) {
            return Err(GeneticError::Configuration(format!(
                "Expected value of the worst individual must be in [0, 1], but was {}",
                n_minus
            )));
        }
        Ok(Self { n_minus })
    }

    pub fn n_minus(&self) -> f64 {
        self.n_minus
    }

    pub fn n_plus(&self) -> f64 {
        2.0 - self.n_minus
    }
}

impl Default for LinearRankSelector {
    fn default() -> Self {
        Self { n_minus: 0.5 }
    }
}

impl ProbabilitySelector for LinearRankSelector {
    fn sorted(&self) -> bool {
        true
    }

    fn probabilities(&self, fitness: &[f64]) -> Vec<f64> {
        let n = fitness.len();
        if n == 1 {
            return vec![1.0];
        }
        let (n_minus, n_plus) = (self.n_minus, self.n_plus());
        let last = (n - 1) as f64;
        (0..n)
            .map(|rank| (n_plus - (n_plus - n_minus) * rank as f64 / last) / n as f64)
            .collect()
    }
}

/// Exponential ranking selection.
///
/// The population is sorted best first and individual of rank `r` (0 is the best)
/// is selected with probability `(c - 1) * c^r / (c^N - 1)`. Values of `c` close to
/// one give an almost uniform selection, values close to zero concentrate on the
/// best individuals.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ExponentialRankConfig")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialRankSelector {
    c: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ExponentialRankConfig {
    c: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ExponentialRankConfig> for ExponentialRankSelector {
    type Error = GeneticError;

    fn try_from(config: ExponentialRankConfig) -> Result<Self> {
        Self::new(config.c)
    }
}

impl ExponentialRankSelector {
    /// # Errors
    ///
    /// Returns an error if `c` is not in `(0, 1)`.
    pub fn new(c: f64) -> Result<Self> {
        if !(c > 0.0 && c < 1.0) {
            return Err(GeneticError::Configuration(format!(
                "Exponential rank base must be in (0, 1), but was {}",
                c
            )));
        }
        Ok(Self { c })
    }

    pub fn c(&self) -> f64 {
        self.c
    }
}

impl Default for ExponentialRankSelector {
    fn default() -> Self {
        Self { c: 0.975 }
    }
}

impl ProbabilitySelector for ExponentialRankSelector {
    fn sorted(&self) -> bool {
        true
    }

    fn probabilities(&self, fitness: &[f64]) -> Vec<f64> {
        let n = fitness.len();
        let c = self.c;
        let normalizer = (c - 1.0) / (c.powi(n as i32) - 1.0);

        let mut probabilities = Vec::with_capacity(n);
        let mut power = 1.0;
        for _ in 0..n {
            probabilities.push(normalizer * power);
            power *= c;
        }
        probabilities
    }
}
