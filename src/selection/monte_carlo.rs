use rand::{Rng, RngCore};

use super::Selector;
use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::population::Population;

/// Selects individuals uniformly at random, ignoring their fitness.
///
/// Useful as a baseline for judging the other selectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloSelector;

impl MonteCarloSelector {
    pub fn new() -> Self {
        Self
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for MonteCarloSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        _optimize: Optimize,
        rng: &mut dyn RngCore,
    ) -> Result<Population<C, F>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        Ok((0..count)
            .map(|_| population[rng.gen_range(0..population.len())].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::test_support::population_of;
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_does_not_evaluate_fitness() {
        let population = population_of(&[1.0, 2.0, 3.0]);
        let mut rng = RandomNumberGenerator::from_seed(4);
        let selected = MonteCarloSelector::new()
            .select(&population, 10, Optimize::Maximum, &mut rng)
            .unwrap();
        assert_eq!(selected.len(), 10);
        assert!(population.iter().all(|p| !p.is_evaluated()));
        assert!(selected
            .iter()
            .all(|s| population.iter().any(|p| p.ptr_eq(s))));
    }
}
