use rand::RngCore;

use super::Selector;
use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::population::Population;

/// Deterministically selects the `count` fittest individuals, best first.
///
/// Unlike the other selectors, truncation draws without replacement, so `count`
/// must not exceed the population size.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncationSelector;

impl TruncationSelector {
    pub fn new() -> Self {
        Self
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for TruncationSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        _rng: &mut dyn RngCore,
    ) -> Result<Population<C, F>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if count > population.len() {
            return Err(GeneticError::Selection(format!(
                "Cannot truncate a population of {} individuals to {}",
                population.len(),
                count
            )));
        }

        let mut sorted = population.clone();
        sorted.sort_by_optimize(optimize);
        Ok(sorted.into_iter().take(count).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::test_support::{fitness_of, population_of};
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_selects_fittest_in_order() {
        let population = population_of(&[5.0, 3.0, 9.0, 1.0]);
        let mut rng = RandomNumberGenerator::from_seed(0);

        let selected = TruncationSelector::new()
            .select(&population, 2, Optimize::Maximum, &mut rng)
            .unwrap();
        assert_eq!(fitness_of(&selected), vec![9.0, 5.0]);

        let selected = TruncationSelector::new()
            .select(&population, 3, Optimize::Minimum, &mut rng)
            .unwrap();
        assert_eq!(fitness_of(&selected), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_count_larger_than_population_fails() {
        let population = population_of(&[5.0, 3.0, 9.0, 1.0]);
        let mut rng = RandomNumberGenerator::from_seed(0);
        let result = TruncationSelector::new().select(&population, 5, Optimize::Maximum, &mut rng);
        assert!(matches!(result, Err(GeneticError::Selection(_))));
    }
}
