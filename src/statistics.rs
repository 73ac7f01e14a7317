//! # Statistics
//!
//! A [`StatisticsCalculator`] reduces a population to a [`Statistics`] summary in a
//! single pass: best and worst phenotype plus the first two moments of fitness and
//! age. The concurrent mode splits the population like the concurrent evaluator and
//! merges the partial results. Workers only search the extremes and collect the
//! samples of their slice; the moments are summed on the caller in population order,
//! so the result is identical to the serial one for every partition count.

use std::fmt;
use std::time::Duration;

use crate::concurrency::{partition, Executor};
use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::phenotype::Phenotype;
use crate::population::Population;

/// Count, sum and sum of squares of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    /// Combines two disjoint samples.
    pub fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.sum_sq
    }

    /// `0` for an empty sample.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Biased (population) variance, `sum_sq / N - mean^2`.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.mean();
        (self.sum_sq / n - mean * mean).max(0.0)
    }

    /// Unbiased (sample) variance, `(sum_sq - N * mean^2) / (N - 1)`.
    pub fn unbiased_variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.mean();
        ((self.sum_sq - n * mean * mean) / (n - 1.0)).max(0.0)
    }

    /// Standard error of the mean, `sqrt(variance / (N - 1))`.
    pub fn standard_error(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.variance() / (self.count as f64 - 1.0)).sqrt()
    }
}

/// Wall-clock durations of the phases of one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeStatistics {
    pub selection: Duration,
    pub alteration: Duration,
    pub combination: Duration,
    pub evaluation: Duration,
    pub statistics: Duration,
    pub execution: Duration,
}

/// Summary of one generation.
#[derive(Debug, Clone)]
pub struct Statistics<C: Chromosome, F: Fitness> {
    generation: usize,
    optimize: Optimize,
    best: Option<Phenotype<C, F>>,
    worst: Option<Phenotype<C, F>>,
    fitness: Moments,
    age: Moments,
    killed: usize,
    invalid: usize,
    altered: usize,
    time: TimeStatistics,
}

impl<C: Chromosome, F: Fitness> Statistics<C, F> {
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn optimize(&self) -> Optimize {
        self.optimize
    }

    /// The best phenotype; `None` for an empty population.
    pub fn best(&self) -> Option<&Phenotype<C, F>> {
        self.best.as_ref()
    }

    pub fn worst(&self) -> Option<&Phenotype<C, F>> {
        self.worst.as_ref()
    }

    pub fn best_fitness(&self) -> Option<F> {
        self.best.as_ref().map(Phenotype::fitness)
    }

    pub fn worst_fitness(&self) -> Option<F> {
        self.worst.as_ref().map(Phenotype::fitness)
    }

    pub fn samples(&self) -> usize {
        self.fitness.count()
    }

    pub fn fitness_moments(&self) -> &Moments {
        &self.fitness
    }

    pub fn age_moments(&self) -> &Moments {
        &self.age
    }

    pub fn fitness_mean(&self) -> f64 {
        self.fitness.mean()
    }

    pub fn fitness_variance(&self) -> f64 {
        self.fitness.variance()
    }

    pub fn age_mean(&self) -> f64 {
        self.age.mean()
    }

    pub fn age_variance(&self) -> f64 {
        self.age.variance()
    }

    /// Survivors replaced because they exceeded the maximal age.
    pub fn killed(&self) -> usize {
        self.killed
    }

    /// Survivors replaced because their genotype was invalid.
    pub fn invalid(&self) -> usize {
        self.invalid
    }

    /// Number of alterations reported by the alterer pipeline.
    pub fn altered(&self) -> usize {
        self.altered
    }

    pub fn time(&self) -> &TimeStatistics {
        &self.time
    }

    pub(crate) fn with_replacements(mut self, killed: usize, invalid: usize) -> Self {
        self.killed = killed;
        self.invalid = invalid;
        self
    }

    pub(crate) fn with_altered(mut self, altered: usize) -> Self {
        self.altered = altered;
        self
    }

    pub(crate) fn with_time(mut self, time: TimeStatistics) -> Self {
        self.time = time;
        self
    }
}

impl<C: Chromosome, F: Fitness> fmt::Display for Statistics<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: samples={}, best={:?}, worst={:?}, mean={:.4}, variance={:.4}, \
             age mean={:.2}, killed={}, invalid={}, altered={}",
            self.generation,
            self.samples(),
            self.best_fitness(),
            self.worst_fitness(),
            self.fitness_mean(),
            self.fitness_variance(),
            self.age_mean(),
            self.killed,
            self.invalid,
            self.altered
        )
    }
}

/// Partial reduction over a slice of the population.
///
/// Keeps the `(fitness, age)` samples in population order instead of partial sums,
/// so the moments do not depend on the partitioning.
struct Accumulator<C: Chromosome, F: Fitness> {
    best: Option<Phenotype<C, F>>,
    worst: Option<Phenotype<C, F>>,
    samples: Vec<(f64, f64)>,
}

impl<C: Chromosome, F: Fitness> Accumulator<C, F> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            best: None,
            worst: None,
            samples: Vec::with_capacity(capacity),
        }
    }

    fn accept(&mut self, phenotype: &Phenotype<C, F>, generation: usize, optimize: Optimize) {
        let fitness = phenotype.fitness();
        self.samples
            .push((fitness.to_f64(), phenotype.age(generation) as f64));

        let better = match &self.best {
            Some(best) => optimize.is_better(&fitness, &best.fitness()),
            None => true,
        };
        if better {
            self.best = Some(phenotype.clone());
        }

        let worse = match &self.worst {
            Some(worst) => optimize.is_better(&worst.fitness(), &fitness),
            None => true,
        };
        if worse {
            self.worst = Some(phenotype.clone());
        }
    }

    /// `other` must cover indices after `self`; ties keep the earlier phenotype.
    fn merge(mut self, other: Self, optimize: Optimize) -> Self {
        let best = match (self.best, other.best) {
            (Some(a), Some(b)) => {
                if optimize.is_better(&b.fitness(), &a.fitness()) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, b) => a.or(b),
        };
        let worst = match (self.worst, other.worst) {
            (Some(a), Some(b)) => {
                if optimize.is_better(&a.fitness(), &b.fitness()) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, b) => a.or(b),
        };
        self.samples.extend(other.samples);
        Self {
            best,
            worst,
            samples: self.samples,
        }
    }

    fn into_statistics(self, generation: usize, optimize: Optimize) -> Statistics<C, F> {
        let mut fitness = Moments::new();
        let mut age = Moments::new();
        for (value, years) in self.samples {
            fitness.push(value);
            age.push(years);
        }

        Statistics {
            generation,
            optimize,
            best: self.best,
            worst: self.worst,
            fitness,
            age,
            killed: 0,
            invalid: 0,
            altered: 0,
            time: TimeStatistics::default(),
        }
    }
}

/// Computes [`Statistics`] serially or over partitions on an [`Executor`].
#[derive(Debug, Clone)]
pub struct StatisticsCalculator {
    executor: Executor,
    partitions: usize,
}

impl StatisticsCalculator {
    pub fn serial() -> Self {
        Self {
            executor: Executor::Inline,
            partitions: 1,
        }
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `partitions` is zero.
    pub fn concurrent(executor: Executor, partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(GeneticError::Configuration(
                "Number of statistics partitions must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            executor,
            partitions,
        })
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    /// Summarizes `population` as seen in `generation`. An empty population yields
    /// empty statistics (no best or worst, mean 0).
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Evaluation` if a lazily computed fitness panics on a
    /// worker.
    pub fn evaluate<C: Chromosome, F: Fitness>(
        &self,
        population: &Population<C, F>,
        generation: usize,
        optimize: Optimize,
    ) -> Result<Statistics<C, F>> {
        let phenotypes = population.as_slice();

        let accumulator = if self.partitions <= 1 || phenotypes.len() < 2 {
            let mut accumulator = Accumulator::with_capacity(phenotypes.len());
            for phenotype in phenotypes {
                accumulator.accept(phenotype, generation, optimize);
            }
            accumulator
        } else {
            let slices = partition(phenotypes.len(), self.partitions);
            let parts = self.executor.try_map(slices, |range| {
                let mut accumulator = Accumulator::with_capacity(range.len());
                for phenotype in &phenotypes[range] {
                    accumulator.accept(phenotype, generation, optimize);
                }
                Ok(accumulator)
            })?;
            parts
                .into_iter()
                .fold(Accumulator::with_capacity(phenotypes.len()), |acc, part| {
                    acc.merge(part, optimize)
                })
        };

        Ok(accumulator.into_statistics(generation, optimize))
    }
}

impl Default for StatisticsCalculator {
    fn default() -> Self {
        Self::serial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::test_support::population_of;

    #[test]
    fn test_empty_population() {
        let population = population_of(&[]);
        let statistics = StatisticsCalculator::serial()
            .evaluate(&population, 1, Optimize::Maximum)
            .unwrap();
        assert!(statistics.best().is_none());
        assert!(statistics.worst().is_none());
        assert_eq!(statistics.samples(), 0);
        assert_eq!(statistics.fitness_mean(), 0.0);
        assert_eq!(statistics.fitness_variance(), 0.0);
    }

    #[test]
    fn test_mean_and_extremes() {
        let population = population_of(&[4.0, -2.0, 10.0, 0.0]);
        let statistics = StatisticsCalculator::serial()
            .evaluate(&population, 3, Optimize::Maximum)
            .unwrap();
        assert_eq!(statistics.samples(), 4);
        assert_eq!(statistics.fitness_mean(), 3.0);
        assert_eq!(statistics.best_fitness(), Some(10.0));
        assert_eq!(statistics.worst_fitness(), Some(-2.0));
        assert_eq!(statistics.age_mean(), 3.0);
        assert_eq!(statistics.age_variance(), 0.0);

        let minimum = StatisticsCalculator::serial()
            .evaluate(&population, 3, Optimize::Minimum)
            .unwrap();
        assert_eq!(minimum.best_fitness(), Some(-2.0));
        assert_eq!(minimum.worst_fitness(), Some(10.0));
    }

    #[test]
    fn test_variance_conventions() {
        let mut moments = Moments::new();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            moments.push(value);
        }
        assert_eq!(moments.mean(), 5.0);
        assert_eq!(moments.variance(), 4.0);
        assert!((moments.unbiased_variance() - 32.0 / 7.0).abs() < 1e-12);
        assert!((moments.standard_error() - (4.0f64 / 7.0).sqrt()).abs() < 1e-12);

        let mut single = Moments::new();
        single.push(3.0);
        assert_eq!(single.variance(), 0.0);
        assert_eq!(single.unbiased_variance(), 0.0);
    }

    #[test]
    fn test_concurrent_matches_serial() {
        let values: Vec<f64> = (0..23).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
        let population = population_of(&values);
        let serial = StatisticsCalculator::serial()
            .evaluate(&population, 0, Optimize::Maximum)
            .unwrap();

        let executor = Executor::with_threads(3).unwrap();
        for k in 1..=values.len() {
            let concurrent = StatisticsCalculator::concurrent(executor.clone(), k)
                .unwrap()
                .evaluate(&population, 0, Optimize::Maximum)
                .unwrap();
            assert_eq!(concurrent.fitness_moments(), serial.fitness_moments());
            assert_eq!(concurrent.age_moments(), serial.age_moments());
            assert!(concurrent.best().unwrap().ptr_eq(serial.best().unwrap()));
            assert!(concurrent.worst().unwrap().ptr_eq(serial.worst().unwrap()));
        }
    }

    #[test]
    fn test_concurrent_matches_serial_for_fractional_fitness() {
        let values: Vec<f64> = (0..40)
            .map(|i| 0.1 * i as f64 + 1e-3 / (i as f64 + 1.0))
            .collect();
        let population = population_of(&values);
        let serial = StatisticsCalculator::serial()
            .evaluate(&population, 2, Optimize::Minimum)
            .unwrap();

        for k in 1..=values.len() {
            let concurrent = StatisticsCalculator::concurrent(Executor::Inline, k)
                .unwrap()
                .evaluate(&population, 2, Optimize::Minimum)
                .unwrap();
            assert_eq!(concurrent.fitness_moments(), serial.fitness_moments(), "k = {}", k);
            assert_eq!(concurrent.fitness_mean(), serial.fitness_mean(), "k = {}", k);
            assert_eq!(
                concurrent.fitness_variance().to_bits(),
                serial.fitness_variance().to_bits(),
                "k = {}",
                k
            );
            assert!(concurrent.best().unwrap().ptr_eq(serial.best().unwrap()));
        }
    }

    #[test]
    fn test_zero_partitions_rejected() {
        assert!(StatisticsCalculator::concurrent(Executor::Inline, 0).is_err());
    }
}
