//! # Evaluation
//!
//! An [`Evaluator`] makes sure every phenotype of a population has its fitness
//! computed. Fitness is memoized inside the phenotype, so evaluating twice is cheap
//! and evaluating on a worker thread is safe.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genforge::concurrency::Executor;
//! use genforge::evaluation::{ConcurrentEvaluator, Evaluator};
//! use genforge::fitness::IdentityScaler;
//! use genforge::genetics::{BitChromosome, Genotype};
//! use genforge::phenotype::Phenotype;
//! use genforge::population::Population;
//!
//! let population: Population<BitChromosome, usize> = (0..8)
//!     .map(|_| {
//!         Phenotype::new(
//!             Genotype::single(BitChromosome::from_bits(&[true, false, true]).unwrap()),
//!             Arc::new(|gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones()),
//!             Arc::new(IdentityScaler),
//!             0,
//!         )
//!     })
//!     .collect();
//!
//! let evaluator = ConcurrentEvaluator::new(Executor::Global, 4).unwrap();
//! evaluator.evaluate(&population).unwrap();
//! assert!(population.iter().all(|p| p.is_evaluated()));
//! ```

use std::fmt::Debug;

use crate::concurrency::{partition, Executor};
use crate::error::{GeneticError, Result};
use crate::fitness::Fitness;
use crate::genetics::Chromosome;
use crate::population::Population;

/// Computes the fitness of every phenotype of a population.
pub trait Evaluator<C: Chromosome, F: Fitness>: Debug + Send + Sync {
    /// Returns once every phenotype is evaluated.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::FitnessCalculation` for a non-finite fitness value and
    /// `GeneticError::Evaluation` if the fitness function panicked.
    fn evaluate(&self, population: &Population<C, F>) -> Result<()>;
}

/// Evaluates the population on the calling thread, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialEvaluator;

impl<C: Chromosome, F: Fitness> Evaluator<C, F> for SerialEvaluator {
    fn evaluate(&self, population: &Population<C, F>) -> Result<()> {
        let phenotypes = population.as_slice();
        Executor::Inline.try_map(vec![0..phenotypes.len()], |range| {
            phenotypes[range]
                .iter()
                .try_for_each(|phenotype| phenotype.evaluate())
        })?;
        Ok(())
    }
}

/// Splits the population into contiguous slices and evaluates the slices on an
/// [`Executor`].
#[derive(Debug, Clone)]
pub struct ConcurrentEvaluator {
    executor: Executor,
    partitions: usize,
}

impl ConcurrentEvaluator {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `partitions` is zero.
    pub fn new(executor: Executor, partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(GeneticError::Configuration(
                "Number of evaluation partitions must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            executor,
            partitions,
        })
    }

    /// One partition per worker thread of `executor`.
    pub fn with_executor(executor: Executor) -> Self {
        let partitions = executor.concurrency().max(1);
        Self {
            executor,
            partitions,
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

impl<C: Chromosome, F: Fitness> Evaluator<C, F> for ConcurrentEvaluator {
    fn evaluate(&self, population: &Population<C, F>) -> Result<()> {
        let phenotypes = population.as_slice();
        let slices = partition(phenotypes.len(), self.partitions);
        self.executor.try_map(slices, |range| {
            phenotypes[range]
                .iter()
                .try_for_each(|phenotype| phenotype.evaluate())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::fitness::IdentityScaler;
    use crate::genetics::{BitChromosome, Genotype};
    use crate::phenotype::Phenotype;

    fn population(
        size: usize,
        function: impl Fn(&Genotype<BitChromosome>) -> f64 + Send + Sync + 'static,
    ) -> Population<BitChromosome, f64> {
        let function = Arc::new(function);
        (0..size)
            .map(|i| {
                let bits: Vec<bool> = (0..6).map(|b| (i >> b) & 1 == 1).collect();
                Phenotype::<BitChromosome, f64>::new(
                    Genotype::single(BitChromosome::from_bits(&bits).unwrap()),
                    function.clone(),
                    Arc::new(IdentityScaler),
                    0,
                )
            })
            .collect()
    }

    #[test]
    fn test_serial_evaluates_everything() {
        let population = population(10, |gt| gt.chromosome(0).count_ones() as f64);
        SerialEvaluator.evaluate(&population).unwrap();
        assert!(population.iter().all(Phenotype::is_evaluated));
    }

    #[test]
    fn test_concurrent_evaluates_each_phenotype_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let population = population(37, move |gt| {
            counter.fetch_add(1, Ordering::SeqCst);
            gt.chromosome(0).count_ones() as f64
        });

        let evaluator = ConcurrentEvaluator::new(Executor::with_threads(4).unwrap(), 5).unwrap();
        evaluator.evaluate(&population).unwrap();
        evaluator.evaluate(&population).unwrap();

        assert!(population.iter().all(Phenotype::is_evaluated));
        assert_eq!(calls.load(Ordering::SeqCst), 37);
    }

    #[test]
    fn test_worker_panic_is_propagated() {
        let population = population(16, |gt| {
            if gt.chromosome(0).count_ones() == 3 {
                panic!("fitness exploded");
            }
            1.0
        });

        let evaluator = ConcurrentEvaluator::new(Executor::with_threads(2).unwrap(), 4).unwrap();
        let result = evaluator.evaluate(&population);
        assert!(matches!(result, Err(GeneticError::Evaluation(_))));
    }

    #[test]
    fn test_serial_panic_is_reported_like_concurrent() {
        let population = population(16, |gt| {
            if gt.chromosome(0).count_ones() == 3 {
                panic!("fitness exploded");
            }
            1.0
        });

        match SerialEvaluator.evaluate(&population) {
            Err(GeneticError::Evaluation(msg)) => assert!(msg.contains("fitness exploded")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_fitness_fails() {
        let population = population(4, |_| f64::INFINITY);
        assert!(matches!(
            SerialEvaluator.evaluate(&population),
            Err(GeneticError::FitnessCalculation(_))
        ));
    }

    #[test]
    fn test_zero_partitions_rejected() {
        assert!(ConcurrentEvaluator::new(Executor::Inline, 0).is_err());
    }
}
