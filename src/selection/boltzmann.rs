use super::probability::{uniform, ProbabilitySelector};
use crate::error::{GeneticError, Result};

/// Boltzmann selection, `p_i = exp(b * f_i) / sum_j exp(b * f_j)`.
///
/// Larger values of `b` increase the selection pressure. The exponent is shifted by
/// the largest fitness value, which leaves the probabilities unchanged but keeps
/// `exp` from overflowing.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "BoltzmannConfig")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltzmannSelector {
    b: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct BoltzmannConfig {
    b: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<BoltzmannConfig> for BoltzmannSelector {
    type Error = GeneticError;

    fn try_from(config: BoltzmannConfig) -> Result<Self> {
        Self::new(config.b)
    }
}

impl BoltzmannSelector {
    /// # Errors
    ///
    /// Returns an error if `b` is not finite.
    pub fn new(b: f64) -> Result<Self> {
        if !b.is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Boltzmann selection strength must be finite, but was {}",
                b
            )));
        }
        Ok(Self { b })
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

impl Default for BoltzmannSelector {
    fn default() -> Self {
        Self { b: 4.0 }
    }
}

impl ProbabilitySelector for BoltzmannSelector {
    fn probabilities(&self, fitness: &[f64]) -> Vec<f64> {
        let max = fitness
            .iter()
            .map(|f| self.b * f)
            .fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = fitness.iter().map(|f| (self.b * f - max).exp()).collect();
        let total: f64 = weights.iter().sum();

        if total > 0.0 && total.is_finite() {
            weights.iter().map(|w| w / total).collect()
        } else {
            uniform(fitness.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities() {
        let probabilities = BoltzmannSelector::new(1.0).unwrap().probabilities(&[0.0, 1.0]);
        let e = std::f64::consts::E;
        assert!((probabilities[0] - 1.0 / (1.0 + e)).abs() < 1e-12);
        assert!((probabilities[1] - e / (1.0 + e)).abs() < 1e-12);
    }

    #[test]
    fn test_large_fitness_does_not_overflow() {
        let probabilities = BoltzmannSelector::default().probabilities(&[1000.0, 1000.0, 999.0]);
        assert!(probabilities.iter().all(|p| p.is_finite()));
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(probabilities[0], probabilities[1]);
    }

    #[test]
    fn test_zero_strength_is_uniform() {
        let probabilities = BoltzmannSelector::new(0.0).unwrap().probabilities(&[1.0, 5.0, 9.0]);
        assert!(probabilities.iter().all(|&p| (p - 1.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_non_finite_strength_is_rejected() {
        assert!(BoltzmannSelector::new(f64::NAN).is_err());
    }
}
