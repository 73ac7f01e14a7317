//! # Engine
//!
//! The [`Engine`] drives the generational loop. It starts `Uninitialized`;
//! [`setup`](Engine::setup) creates and evaluates the initial population and makes it
//! `Ready`; every [`evolve`](Engine::evolve) then produces one new generation:
//!
//! 1. select survivors and offspring from the current population,
//! 2. alter the offspring,
//! 3. keep the survivors that are young enough and valid, replace the others by new
//!    random individuals,
//! 4. evaluate the new population and compute its statistics,
//! 5. update the best phenotype ever seen on strict improvement.
//!
//! Generations are strictly sequential. Fitness evaluation and recombination may fan
//! out to worker threads inside a generation, depending on the configured evaluator
//! and alterers.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::options::{EngineOptions, LogLevel};
use crate::alteration::{Alterer, CompositeAlterer, Mutator, SinglePointCrossover};
use crate::error::{GeneticError, Result};
use crate::evaluation::{Evaluator, SerialEvaluator};
use crate::fitness::{Fitness, FitnessFunction, FitnessScaler, IdentityScaler, Optimize};
use crate::genetics::{Chromosome, Genotype, GenotypeFactory};
use crate::phenotype::Phenotype;
use crate::population::Population;
use crate::probability::Probability;
use crate::rng::RandomNumberGenerator;
use crate::selection::{Selector, TournamentSelector};
use crate::statistics::{Statistics, StatisticsCalculator, TimeStatistics};

const DEFAULT_CROSSOVER_PROBABILITY: f64 = 0.1;
const DEFAULT_MUTATION_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Ready,
    Evolving,
}

pub struct Engine<C: Chromosome, F: Fitness> {
    factory: Arc<dyn GenotypeFactory<C>>,
    fitness_function: Arc<dyn FitnessFunction<C, F>>,
    fitness_scaler: Arc<dyn FitnessScaler<F>>,
    survivor_selector: Arc<dyn Selector<C, F>>,
    offspring_selector: Arc<dyn Selector<C, F>>,
    alterer: Arc<dyn Alterer<C, F>>,
    evaluator: Arc<dyn Evaluator<C, F>>,
    statistics_calculator: StatisticsCalculator,
    options: EngineOptions,
    rng: RandomNumberGenerator,

    state: EngineState,
    generation: usize,
    population: Population<C, F>,
    statistics: Option<Statistics<C, F>>,
    best_phenotype: Option<Phenotype<C, F>>,
    best_statistics: Option<Statistics<C, F>>,
    killed: usize,
    invalid: usize,
}

impl<C: Chromosome, F: Fitness> Engine<C, F> {
    /// Creates an engine with the default configuration: tournament selection of size
    /// 3 for survivors and offspring, single point crossover (0.1) followed by
    /// mutation (0.05), serial evaluation and the default [`EngineOptions`].
    pub fn new(
        factory: Arc<dyn GenotypeFactory<C>>,
        fitness_function: Arc<dyn FitnessFunction<C, F>>,
    ) -> Self {
        let alterer = CompositeAlterer::new(vec![
            Arc::new(SinglePointCrossover::from_probability(
                Probability::new_unchecked(DEFAULT_CROSSOVER_PROBABILITY),
            )),
            Arc::new(Mutator::from_probability(Probability::new_unchecked(
                DEFAULT_MUTATION_PROBABILITY,
            ))),
        ]);

        Self {
            factory,
            fitness_function,
            fitness_scaler: Arc::new(IdentityScaler),
            survivor_selector: Arc::new(TournamentSelector::default()),
            offspring_selector: Arc::new(TournamentSelector::default()),
            alterer: Arc::new(alterer),
            evaluator: Arc::new(SerialEvaluator),
            statistics_calculator: StatisticsCalculator::serial(),
            options: EngineOptions::default(),
            rng: RandomNumberGenerator::new(),
            state: EngineState::Uninitialized,
            generation: 0,
            population: Population::new(),
            statistics: None,
            best_phenotype: None,
            best_statistics: None,
            killed: 0,
            invalid: 0,
        }
    }

    /// Creates the initial population, evaluates it and records the first statistics.
    /// Seeded individuals (see [`set_genotypes`](Self::set_genotypes)) are kept and the
    /// population is filled up to the configured size.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::State` if the engine was already set up, or the error
    /// of the evaluation.
    pub fn setup(&mut self) -> Result<()> {
        if self.state != EngineState::Uninitialized {
            return Err(GeneticError::State(
                "setup() may only be called once".to_string(),
            ));
        }

        let start = Instant::now();
        let missing = self
            .options
            .population_size()
            .saturating_sub(self.population.len());
        for _ in 0..missing {
            let phenotype = self.random_phenotype(0);
            self.population.push(phenotype);
        }

        self.evaluator.evaluate(&self.population)?;
        let evaluation = start.elapsed();

        let statistics = self.statistics_calculator.evaluate(
            &self.population,
            1,
            self.options.optimize(),
        )?;
        let statistics = statistics.with_time(TimeStatistics {
            evaluation,
            execution: start.elapsed(),
            ..TimeStatistics::default()
        });

        self.best_phenotype = statistics.best().cloned();
        self.best_statistics = Some(statistics.clone());
        self.statistics = Some(statistics);
        self.generation = 1;
        self.state = EngineState::Ready;

        if self.options.log_level() != LogLevel::None {
            info!(
                population = self.population.len(),
                best = ?self.best_fitness(),
                "Engine set up"
            );
        }
        Ok(())
    }

    /// Evolves one generation and returns its statistics.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::State` if [`setup`](Self::setup) was not called. Errors
    /// of selection, alteration or evaluation abort the generation and leave the
    /// engine at the previous one.
    pub fn evolve(&mut self) -> Result<&Statistics<C, F>> {
        if self.state == EngineState::Uninitialized {
            return Err(GeneticError::State(
                "evolve() called before setup()".to_string(),
            ));
        }

        let generation = self.generation + 1;
        let optimize = self.options.optimize();
        let mut time = TimeStatistics::default();
        let execution = Instant::now();

        let start = Instant::now();
        let survivors = self.survivor_selector.select(
            &self.population,
            self.options.survivors(),
            optimize,
            &mut self.rng,
        )?;
        let mut offspring = self.offspring_selector.select(
            &self.population,
            self.options.offspring(),
            optimize,
            &mut self.rng,
        )?;
        time.selection = start.elapsed();

        let start = Instant::now();
        let altered = self.alterer.alter(&mut offspring, generation, &mut self.rng)?;
        time.alteration = start.elapsed();

        let start = Instant::now();
        let survivor_count = survivors.len();
        let (next, killed, invalid) = self.combine(survivors, offspring, generation);
        time.combination = start.elapsed();

        let start = Instant::now();
        self.evaluator.evaluate(&next)?;
        time.evaluation = start.elapsed();

        let start = Instant::now();
        let statistics = self
            .statistics_calculator
            .evaluate(&next, generation, optimize)?;
        time.statistics = start.elapsed();
        time.execution = execution.elapsed();

        let statistics = statistics
            .with_replacements(killed, invalid)
            .with_altered(altered)
            .with_time(time);

        self.population = next;
        self.generation = generation;
        self.state = EngineState::Evolving;
        self.killed += killed;
        self.invalid += invalid;

        if let Some(candidate) = statistics.best() {
            let improved = match &self.best_phenotype {
                Some(best) => optimize.is_better(&candidate.fitness(), &best.fitness()),
                None => true,
            };
            if improved {
                self.best_phenotype = Some(candidate.clone());
                self.best_statistics = Some(statistics.clone());
            }
        }

        self.log_generation(&statistics, survivor_count);
        let statistics: &Statistics<C, F> = self.statistics.insert(statistics);
        Ok(statistics)
    }

    /// Evolves `generations` generations.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error of [`evolve`](Self::evolve).
    pub fn evolve_n(&mut self, generations: usize) -> Result<()> {
        for _ in 0..generations {
            self.evolve()?;
        }
        Ok(())
    }

    /// Evolves while `proceed` holds for the statistics of the current generation and
    /// returns the number of evolved generations.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error of [`evolve`](Self::evolve).
    pub fn evolve_until<P>(&mut self, mut proceed: P) -> Result<usize>
    where
        P: FnMut(&Statistics<C, F>) -> bool,
    {
        if self.state == EngineState::Uninitialized {
            return Err(GeneticError::State(
                "evolve_until() called before setup()".to_string(),
            ));
        }

        let mut evolved = 0;
        while self.statistics.as_ref().map_or(true, &mut proceed) {
            self.evolve()?;
            evolved += 1;
        }
        Ok(evolved)
    }

    fn random_phenotype(&mut self, generation: usize) -> Phenotype<C, F> {
        Phenotype::new(
            self.factory.new_genotype(&mut self.rng),
            Arc::clone(&self.fitness_function),
            Arc::clone(&self.fitness_scaler),
            generation,
        )
    }

    /// Builds the next population from the survivors and the altered offspring.
    /// Returns it together with the number of killed and invalid survivors.
    fn combine(
        &mut self,
        survivors: Population<C, F>,
        offspring: Population<C, F>,
        generation: usize,
    ) -> (Population<C, F>, usize, usize) {
        let maximal_age = self.options.maximal_phenotype_age();
        let mut killed = 0;
        let mut invalid = 0;

        let mut next = Population::with_capacity(survivors.len() + offspring.len());
        for survivor in survivors {
            if survivor.age(generation) > maximal_age {
                killed += 1;
                next.push(self.random_phenotype(generation));
            } else if !survivor.is_valid() {
                invalid += 1;
                next.push(self.random_phenotype(generation));
            } else {
                next.push(survivor);
            }
        }
        next.extend(offspring);

        (next, killed, invalid)
    }

    fn log_generation(&self, statistics: &Statistics<C, F>, survivors: usize) {
        let level = self.options.log_level();
        if level == LogLevel::None {
            return;
        }

        info!(
            generation = statistics.generation(),
            best = ?statistics.best_fitness(),
            incumbent = ?self.best_fitness(),
            "Generation evolved"
        );
        if level == LogLevel::Verbose {
            debug!(statistics = %statistics, "Generation statistics");
        }

        let replaced = statistics.killed() + statistics.invalid();
        if survivors > 0 && replaced * 2 > survivors {
            warn!(
                generation = statistics.generation(),
                killed = statistics.killed(),
                invalid = statistics.invalid(),
                survivors,
                "More than half of the survivors were replaced"
            );
        }

        let time = statistics.time();
        trace!(
            selection = ?time.selection,
            alteration = ?time.alteration,
            combination = ?time.combination,
            evaluation = ?time.evaluation,
            statistics = ?time.statistics,
            execution = ?time.execution,
            "Generation timings"
        );
    }

    fn require_uninitialized(&self, operation: &str) -> Result<()> {
        if self.state != EngineState::Uninitialized {
            return Err(GeneticError::State(format!(
                "{} is only possible before setup()",
                operation
            )));
        }
        Ok(())
    }

    /// Seeds the initial population with `genotypes`, born in generation 0.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::State` after [`setup`](Self::setup).
    pub fn set_genotypes(&mut self, genotypes: Vec<Genotype<C>>) -> Result<()> {
        self.require_uninitialized("Seeding genotypes")?;
        self.population = genotypes
            .into_iter()
            .map(|genotype| {
                Phenotype::new(
                    genotype,
                    Arc::clone(&self.fitness_function),
                    Arc::clone(&self.fitness_scaler),
                    0,
                )
            })
            .collect();
        Ok(())
    }

    /// Seeds the initial population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::State` after [`setup`](Self::setup).
    pub fn set_population(&mut self, population: Population<C, F>) -> Result<()> {
        self.require_uninitialized("Seeding the population")?;
        self.population = population;
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The current generation: 0 before setup, 1 right after it.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population<C, F> {
        &self.population
    }

    /// Statistics of the current generation.
    pub fn statistics(&self) -> Option<&Statistics<C, F>> {
        self.statistics.as_ref()
    }

    /// The best phenotype ever seen.
    pub fn best_phenotype(&self) -> Option<&Phenotype<C, F>> {
        self.best_phenotype.as_ref()
    }

    pub fn best_fitness(&self) -> Option<F> {
        self.best_phenotype.as_ref().map(Phenotype::fitness)
    }

    /// Statistics of the generation that produced the best phenotype.
    pub fn best_statistics(&self) -> Option<&Statistics<C, F>> {
        self.best_statistics.as_ref()
    }

    /// Total number of survivors replaced for exceeding the maximal age.
    pub fn killed(&self) -> usize {
        self.killed
    }

    /// Total number of survivors replaced for being invalid.
    pub fn invalid(&self) -> usize {
        self.invalid
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EngineOptions) {
        self.options = options;
    }

    /// Uses `selector` for both survivors and offspring.
    pub fn set_selector(&mut self, selector: Arc<dyn Selector<C, F>>) {
        self.survivor_selector = Arc::clone(&selector);
        self.offspring_selector = selector;
    }

    pub fn set_survivor_selector(&mut self, selector: Arc<dyn Selector<C, F>>) {
        self.survivor_selector = selector;
    }

    pub fn set_offspring_selector(&mut self, selector: Arc<dyn Selector<C, F>>) {
        self.offspring_selector = selector;
    }

    pub fn set_alterer(&mut self, alterer: Arc<dyn Alterer<C, F>>) {
        self.alterer = alterer;
    }

    /// Replaces the alterer pipeline by `alterers`, applied in order.
    pub fn set_alterers(&mut self, alterers: Vec<Arc<dyn Alterer<C, F>>>) {
        self.alterer = Arc::new(CompositeAlterer::new(alterers));
    }

    pub fn set_evaluator(&mut self, evaluator: Arc<dyn Evaluator<C, F>>) {
        self.evaluator = evaluator;
    }

    pub fn set_statistics_calculator(&mut self, calculator: StatisticsCalculator) {
        self.statistics_calculator = calculator;
    }

    /// Scales the fitness of phenotypes created from now on.
    pub fn set_fitness_scaler(&mut self, scaler: Arc<dyn FitnessScaler<F>>) {
        self.fitness_scaler = scaler;
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `fraction` is not in `[0, 1]`.
    pub fn set_survivor_fraction(&mut self, fraction: f64) -> Result<()> {
        self.options
            .set_survivor_fraction(Probability::new(fraction)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `fraction` is not in `[0, 1]`.
    pub fn set_offspring_fraction(&mut self, fraction: f64) -> Result<()> {
        self.options
            .set_offspring_fraction(Probability::new(fraction)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `size` is zero.
    pub fn set_population_size(&mut self, size: usize) -> Result<()> {
        self.options.set_population_size(size)
    }

    pub fn set_maximal_phenotype_age(&mut self, age: usize) {
        self.options.set_maximal_phenotype_age(age);
    }

    pub fn set_optimize(&mut self, optimize: Optimize) {
        self.options.set_optimize(optimize);
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.options.set_log_level(log_level);
    }

    pub fn set_rng(&mut self, rng: RandomNumberGenerator) {
        self.rng = rng;
    }

    /// Reseeds the engine's random number generator.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = RandomNumberGenerator::from_seed(seed);
    }
}

impl<C: Chromosome, F: Fitness> fmt::Debug for Engine<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("options", &self.options)
            .field("survivor_selector", &self.survivor_selector)
            .field("offspring_selector", &self.offspring_selector)
            .field("alterer", &self.alterer)
            .field("evaluator", &self.evaluator)
            .field("population", &self.population.len())
            .field("best", &self.best_fitness())
            .finish()
    }
}
