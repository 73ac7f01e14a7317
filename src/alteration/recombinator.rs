//! Pairwise recombination of individuals.
//!
//! For a population of size `N` and recombination probability `p`, two disjoint
//! random index sets of size `min(ceil(N * p), N / 2)` are drawn and paired up in
//! random order. Every pair is recombined independently, so the pairs may run on a
//! worker pool. Each pair receives its own generator derived from the caller's, which
//! makes the result independent of the executor.

use rand::seq::index;
use rand::{Rng, RngCore};

use crate::concurrency::Executor;
use crate::error::Result;
use crate::fitness::Fitness;
use crate::genetics::{Chromosome, Genotype};
use crate::population::Population;
use crate::probability::Probability;
use crate::rng::RandomNumberGenerator;

/// A recombination of two genotypes.
pub trait Recombinator<C: Chromosome>: Send + Sync {
    /// Probability of an individual taking part in a recombination.
    fn probability(&self) -> Probability;

    /// Recombines two genotypes. `None` leaves both partners unchanged.
    fn recombine(
        &self,
        first: &Genotype<C>,
        second: &Genotype<C>,
        rng: &mut dyn RngCore,
    ) -> Option<(Genotype<C>, Genotype<C>)>;
}

/// Recombines random pairs of `population` and returns the number of individuals
/// that were replaced.
pub(crate) fn recombine_population<C, F, R>(
    recombinator: &R,
    executor: &Executor,
    population: &mut Population<C, F>,
    generation: usize,
    rng: &mut dyn RngCore,
) -> Result<usize>
where
    C: Chromosome,
    F: Fitness,
    R: Recombinator<C> + ?Sized,
{
    let size = population.len();
    let pairs = pair_count(size, recombinator.probability());
    if pairs == 0 {
        return Ok(0);
    }

    let indices = index::sample(&mut *rng, size, 2 * pairs).into_vec();
    let generators = RandomNumberGenerator::split_n(rng, pairs);
    let tasks: Vec<(usize, usize, RandomNumberGenerator)> = indices[..pairs]
        .iter()
        .zip(&indices[pairs..])
        .zip(generators)
        .map(|((&first, &second), generator)| (first, second, generator))
        .collect();

    let current = &*population;
    let offspring = executor.try_map(tasks, |(first, second, mut generator)| {
        Ok(recombinator
            .recombine(
                current[first].genotype(),
                current[second].genotype(),
                &mut generator,
            )
            .map(|children| (first, second, children)))
    })?;

    let mut altered = 0;
    for (first, second, (first_child, second_child)) in offspring.into_iter().flatten() {
        let first_child = population[first].new_instance(first_child, generation);
        let second_child = population[second].new_instance(second_child, generation);
        population.set(first, first_child);
        population.set(second, second_child);
        altered += 2;
    }
    Ok(altered)
}

fn pair_count(size: usize, probability: Probability) -> usize {
    let wanted = (size as f64 * probability.value()).ceil() as usize;
    wanted.min(size / 2)
}

/// A random chromosome index valid for both genotypes.
pub(crate) fn chromosome_index<C: Chromosome>(
    first: &Genotype<C>,
    second: &Genotype<C>,
    rng: &mut dyn RngCore,
) -> usize {
    rng.gen_range(0..first.len().min(second.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_count() {
        let p = |v: f64| Probability::new(v).unwrap();
        assert_eq!(pair_count(10, p(0.1)), 1);
        assert_eq!(pair_count(10, p(0.25)), 3);
        assert_eq!(pair_count(10, p(1.0)), 5);
        assert_eq!(pair_count(11, p(0.9)), 5);
        assert_eq!(pair_count(1, p(1.0)), 0);
        assert_eq!(pair_count(10, Probability::ZERO), 0);
    }
}
