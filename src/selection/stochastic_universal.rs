use rand::{Rng, RngCore};

use super::probability::selection_probabilities;
use super::roulette::RouletteWheelSelector;
use super::Selector;
use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::population::Population;

/// Stochastic universal sampling.
///
/// Uses the roulette wheel probabilities, but places `count` equally spaced pointers
/// on the wheel, offset by a single random draw. The number of copies of an
/// individual differs from its expectation by less than one.
#[derive(Debug, Clone, Copy, Default)]
pub struct StochasticUniversalSelector;

impl StochasticUniversalSelector {
    pub fn new() -> Self {
        Self
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for StochasticUniversalSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut dyn RngCore,
    ) -> Result<Population<C, F>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let probabilities = selection_probabilities(&RouletteWheelSelector, population, optimize);
        let last = probabilities.len() - 1;
        let step = 1.0 / count as f64;
        let start = rng.gen::<f64>() * step;

        let mut selection = Population::with_capacity(count);
        let mut index = 0;
        let mut cumulative = probabilities[0];
        for k in 0..count {
            let pointer = start + k as f64 * step;
            while cumulative <= pointer && index < last {
                index += 1;
                cumulative += probabilities[index];
            }
            selection.push(population[index].clone());
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::test_support::population_of;
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_copies_match_expectation() {
        // Probabilities 0, 0.1, 0.2, 0.3, 0.4.
        let population = population_of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut rng = RandomNumberGenerator::from_seed(5);

        for _ in 0..20 {
            let selected = StochasticUniversalSelector::new()
                .select(&population, 20, Optimize::Maximum, &mut rng)
                .unwrap();
            assert_eq!(selected.len(), 20);

            for (index, expected) in [0.0, 2.0, 4.0, 6.0, 8.0].iter().enumerate() {
                let copies = selected
                    .iter()
                    .filter(|p| p.ptr_eq(&population[index]))
                    .count() as f64;
                assert!((copies - expected).abs() < 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_empty_population_fails() {
        let population = population_of(&[]);
        let mut rng = RandomNumberGenerator::from_seed(5);
        assert!(matches!(
            StochasticUniversalSelector::new().select(&population, 3, Optimize::Maximum, &mut rng),
            Err(GeneticError::EmptyPopulation)
        ));
    }
}
