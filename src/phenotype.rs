//! # Phenotype
//!
//! A [`Phenotype`] is a [`Genotype`] together with the generation it was born in and
//! the fitness function and scaler that judge it. Fitness is computed lazily, exactly
//! once, and memoized; the computation may happen on a worker thread.
//!
//! ```rust
//! use std::sync::Arc;
//! use genforge::fitness::IdentityScaler;
//! use genforge::genetics::{BitChromosome, Genotype};
//! use genforge::phenotype::Phenotype;
//!
//! let genotype = Genotype::single(BitChromosome::from_bits(&[true, true, false]).unwrap());
//! let phenotype: Phenotype<BitChromosome, usize> = Phenotype::new(
//!     genotype,
//!     Arc::new(|gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones()),
//!     Arc::new(IdentityScaler),
//!     0,
//! );
//!
//! assert!(!phenotype.is_evaluated());
//! assert_eq!(phenotype.fitness(), 2);
//! assert!(phenotype.is_evaluated());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, FitnessFunction, FitnessScaler};
use crate::genetics::{Chromosome, Genotype};

/// The memoized fitness of a phenotype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluated<F> {
    pub raw: F,
    pub scaled: F,
}

struct Inner<C: Chromosome, F: Fitness> {
    genotype: Genotype<C>,
    generation: usize,
    function: Arc<dyn FitnessFunction<C, F>>,
    scaler: Arc<dyn FitnessScaler<F>>,
    fitness: OnceLock<Evaluated<F>>,
}

/// An individual of the population.
///
/// Cloning is cheap and clones share the memoized fitness.
pub struct Phenotype<C: Chromosome, F: Fitness> {
    inner: Arc<Inner<C, F>>,
}

impl<C: Chromosome, F: Fitness> Phenotype<C, F> {
    pub fn new(
        genotype: Genotype<C>,
        function: Arc<dyn FitnessFunction<C, F>>,
        scaler: Arc<dyn FitnessScaler<F>>,
        generation: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                genotype,
                generation,
                function,
                scaler,
                fitness: OnceLock::new(),
            }),
        }
    }

    /// Creates an unevaluated phenotype judged by the same fitness function and scaler.
    pub fn new_instance(&self, genotype: Genotype<C>, generation: usize) -> Self {
        Self::new(
            genotype,
            Arc::clone(&self.inner.function),
            Arc::clone(&self.inner.scaler),
            generation,
        )
    }

    pub fn genotype(&self) -> &Genotype<C> {
        &self.inner.genotype
    }

    /// The generation this phenotype was created in.
    pub fn generation(&self) -> usize {
        self.inner.generation
    }

    /// Age relative to `current_generation`.
    pub fn age(&self, current_generation: usize) -> usize {
        current_generation.saturating_sub(self.inner.generation)
    }

    pub fn is_valid(&self) -> bool {
        self.inner.genotype.is_valid()
    }

    pub fn is_evaluated(&self) -> bool {
        self.inner.fitness.get().is_some()
    }

    /// Computes the fitness if that hasn't happened yet and returns it.
    pub fn evaluation(&self) -> Evaluated<F> {
        *self.inner.fitness.get_or_init(|| {
            let raw = self.inner.function.fitness(&self.inner.genotype);
            Evaluated {
                raw,
                scaled: self.inner.scaler.scale(raw),
            }
        })
    }

    /// Evaluates the phenotype and checks that the scaled fitness is a usable number.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::FitnessCalculation` for NaN or infinite fitness values.
    pub fn evaluate(&self) -> Result<()> {
        let fitness = self.evaluation();
        if !fitness.scaled.to_f64().is_finite() {
            return Err(GeneticError::FitnessCalculation(format!(
                "Non-finite fitness score encountered: {:?}",
                fitness.scaled
            )));
        }
        Ok(())
    }

    /// The scaled fitness.
    pub fn fitness(&self) -> F {
        self.evaluation().scaled
    }

    pub fn raw_fitness(&self) -> F {
        self.evaluation().raw
    }

    /// Orders phenotypes by scaled fitness.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.fitness().cmp_fitness(&other.fitness())
    }

    /// `true` if both handles refer to the same individual.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C: Chromosome, F: Fitness> Clone for Phenotype<C, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Chromosome, F: Fitness> PartialEq for Phenotype<C, F> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.generation == other.inner.generation
                && self.inner.genotype == other.inner.genotype)
    }
}

impl<C: Chromosome, F: Fitness> fmt::Debug for Phenotype<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phenotype")
            .field("genotype", &self.inner.genotype)
            .field("generation", &self.inner.generation)
            .field("fitness", &self.inner.fitness.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use super::*;
    use crate::fitness::IdentityScaler;
    use crate::genetics::BitChromosome;

    fn genotype(bits: &[bool]) -> Genotype<BitChromosome> {
        Genotype::single(BitChromosome::from_bits(bits).unwrap())
    }

    #[test]
    fn test_fitness_is_computed_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let function = move |gt: &Genotype<BitChromosome>| {
            counter.fetch_add(1, AtomicOrdering::SeqCst);
            gt.chromosome(0).count_ones() as f64
        };
        let phenotype: Phenotype<BitChromosome, f64> = Phenotype::new(
            genotype(&[true, false, true]),
            Arc::new(function),
            Arc::new(IdentityScaler),
            0,
        );
        let clone = phenotype.clone();

        assert_eq!(phenotype.fitness(), 2.0);
        assert_eq!(clone.fitness(), 2.0);
        assert_eq!(phenotype.raw_fitness(), 2.0);
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn test_scaler_is_applied() {
        let phenotype: Phenotype<BitChromosome, f64> = Phenotype::new(
            genotype(&[true, true]),
            Arc::new(|gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones() as f64),
            Arc::new(|f: f64| f * 10.0),
            0,
        );
        assert_eq!(phenotype.raw_fitness(), 2.0);
        assert_eq!(phenotype.fitness(), 20.0);
    }

    #[test]
    fn test_non_finite_fitness_is_reported() {
        let phenotype: Phenotype<BitChromosome, f64> = Phenotype::new(
            genotype(&[true]),
            Arc::new(|_: &Genotype<BitChromosome>| f64::NAN),
            Arc::new(IdentityScaler),
            0,
        );
        assert!(matches!(
            phenotype.evaluate(),
            Err(GeneticError::FitnessCalculation(_))
        ));
    }

    #[test]
    fn test_age_and_new_instance() {
        let phenotype: Phenotype<BitChromosome, usize> = Phenotype::new(
            genotype(&[true]),
            Arc::new(|gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones()),
            Arc::new(IdentityScaler),
            3,
        );
        assert_eq!(phenotype.age(10), 7);
        assert_eq!(phenotype.age(1), 0);

        let child = phenotype.new_instance(genotype(&[false]), 10);
        assert_eq!(child.generation(), 10);
        assert_eq!(child.fitness(), 0);
        assert_eq!(phenotype.compare(&child), Ordering::Greater);
    }
}
