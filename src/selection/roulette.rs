use super::probability::{uniform, ProbabilitySelector};

/// Fitness proportionate selection.
///
/// Each individual is selected with a probability proportional to its fitness minus
/// the worst fitness of the population. If all individuals are equally fit, each one
/// is selected with probability `1 / N`.
///
/// # Examples
///
/// ```
/// use genforge::selection::{ProbabilitySelector, RouletteWheelSelector};
///
/// let probabilities = RouletteWheelSelector::new().probabilities(&[1.0, 2.0, 3.0]);
/// assert_eq!(probabilities, vec![0.0, 1.0 / 3.0, 2.0 / 3.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteWheelSelector;

impl RouletteWheelSelector {
    pub fn new() -> Self {
        Self
    }
}

/// Weights `fitness - worst`, normalized; uniform if they sum to zero.
fn roulette_probabilities(fitness: &[f64]) -> Vec<f64> {
    let worst = fitness.iter().copied().fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = fitness.iter().map(|f| f - worst).collect();
    let total: f64 = weights.iter().sum();

    if total > 0.0 && total.is_finite() {
        weights.iter().map(|w| w / total).collect()
    } else {
        uniform(fitness.len())
    }
}

impl ProbabilitySelector for RouletteWheelSelector {
    fn probabilities(&self, fitness: &[f64]) -> Vec<f64> {
        roulette_probabilities(fitness)
    }
}
