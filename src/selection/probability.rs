//! Shared template of the fitness proportionate selectors.
//!
//! A [`ProbabilitySelector`] assigns each individual a selection probability; the
//! probabilities must sum to one. Draws invert the cumulative distribution: a uniform
//! `u` in `[0, 1)` selects the first index whose cumulative probability exceeds `u`.

use std::fmt::Debug;

use rand::{Rng, RngCore};
use tracing::warn;

use super::Selector;
use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::population::Population;

/// Populations up to this size are searched linearly, larger ones by bisection.
const SERIAL_INDEX_THRESHOLD: usize = 35;

/// Tolerance of the sum-to-one check.
pub(crate) const PROBABILITY_EPSILON: f64 = 1e-6;

pub trait ProbabilitySelector: Debug + Send + Sync {
    /// `true` if the probabilities are computed over the population sorted best
    /// first. Such selectors are independent of the optimization direction.
    fn sorted(&self) -> bool {
        false
    }

    /// Returns one probability per fitness value, for a maximization problem.
    ///
    /// For sorted selectors `fitness` is ordered best first.
    fn probabilities(&self, fitness: &[f64]) -> Vec<f64>;
}

impl<C, F, S> Selector<C, F> for S
where
    C: Chromosome,
    F: Fitness,
    S: ProbabilitySelector,
{
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

        let mut working = population.clone();
        if self.sorted() {
            working.sort_by_optimize(optimize);
        }

        let probabilities = selection_probabilities(self, &working, optimize);
        let cumulative = cumulate(&probabilities);

        let mut selection = Population::with_capacity(count);
        for _ in 0..count {
            let index = index_of(&cumulative, rng.gen::<f64>());
            selection.push(working[index].clone());
        }
        Ok(selection)
    }
}

/// The direction adjusted and validated probabilities of `population`.
pub(crate) fn selection_probabilities<C, F, S>(
    selector: &S,
    population: &Population<C, F>,
    optimize: Optimize,
) -> Vec<f64>
where
    C: Chromosome,
    F: Fitness,
    S: ProbabilitySelector + ?Sized,
{
    let fitness: Vec<f64> = population.iter().map(|p| p.fitness().to_f64()).collect();
    let mut probabilities = selector.probabilities(&fitness);

    if optimize == Optimize::Minimum && !selector.sorted() {
        sort_and_revert(&mut probabilities);
    }

    if probabilities.len() != fitness.len() || probabilities.iter().any(|p| !p.is_finite()) {
        warn!(
            selector = ?selector,
            "Selection probabilities are not usable, falling back to uniform selection"
        );
        return uniform(fitness.len());
    }

    debug_assert!(
        (probabilities.iter().sum::<f64>() - 1.0).abs() < PROBABILITY_EPSILON,
        "Selection probabilities of {:?} do not sum to one",
        selector
    );
    probabilities
}

/// Reassigns the probabilities so that the order of the individuals is reverted:
/// the individual with the largest probability gets the smallest one and so forth.
pub(crate) fn sort_and_revert(probabilities: &mut [f64]) {
    let n = probabilities.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| probabilities[a].total_cmp(&probabilities[b]));

    let original = probabilities.to_vec();
    for i in 0..n {
        probabilities[order[i]] = original[order[n - 1 - i]];
    }
}

pub(crate) fn cumulate(probabilities: &[f64]) -> Vec<f64> {
    probabilities
        .iter()
        .scan(0.0, |sum, p| {
            *sum += p;
            Some(*sum)
        })
        .collect()
}

/// First index whose cumulative probability exceeds `value`, clamped to the last
/// index to absorb rounding errors of the cumulative sum.
pub(crate) fn index_of(cumulative: &[f64], value: f64) -> usize {
    let last = cumulative.len().saturating_sub(1);
    let index = if cumulative.len() <= SERIAL_INDEX_THRESHOLD {
        cumulative
            .iter()
            .position(|&c| c > value)
            .unwrap_or(last)
    } else {
        cumulative.partition_point(|&c| c <= value)
    };
    index.min(last)
}

pub(crate) fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}
