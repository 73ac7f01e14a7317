use std::sync::Arc;

use crate::{
    alteration::Alterer,
    error::{GeneticError, Result},
    evaluation::Evaluator,
    fitness::{Fitness, FitnessFunction, FitnessScaler, Optimize},
    genetics::{Chromosome, Genotype, GenotypeFactory},
    rng::RandomNumberGenerator,
    selection::Selector,
    statistics::StatisticsCalculator,
};

use super::{Engine, EngineOptions, LogLevel};

/// Fluent construction of an [`Engine`]. The genotype factory and the fitness
/// function are required; everything else falls back to the engine's defaults.
pub struct EngineBuilder<C: Chromosome, F: Fitness> {
    factory: Option<Arc<dyn GenotypeFactory<C>>>,
    fitness_function: Option<Arc<dyn FitnessFunction<C, F>>>,
    fitness_scaler: Option<Arc<dyn FitnessScaler<F>>>,
    survivor_selector: Option<Arc<dyn Selector<C, F>>>,
    offspring_selector: Option<Arc<dyn Selector<C, F>>>,
    alterers: Option<Vec<Arc<dyn Alterer<C, F>>>>,
    evaluator: Option<Arc<dyn Evaluator<C, F>>>,
    statistics_calculator: Option<StatisticsCalculator>,
    options: Option<EngineOptions>,
    optimize: Option<Optimize>,
    log_level: Option<LogLevel>,
    seed: Option<u64>,
    genotypes: Option<Vec<Genotype<C>>>,
}

impl<C: Chromosome, F: Fitness> EngineBuilder<C, F> {
    pub fn new() -> Self {
        Self {
            factory: None,
            fitness_function: None,
            fitness_scaler: None,
            survivor_selector: None,
            offspring_selector: None,
            alterers: None,
            evaluator: None,
            statistics_calculator: None,
            options: None,
            optimize: None,
            log_level: None,
            seed: None,
            genotypes: None,
        }
    }

    pub fn with_factory(mut self, factory: Arc<dyn GenotypeFactory<C>>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_fitness_function(mut self, function: Arc<dyn FitnessFunction<C, F>>) -> Self {
        self.fitness_function = Some(function);
        self
    }

    pub fn with_fitness_scaler(mut self, scaler: Arc<dyn FitnessScaler<F>>) -> Self {
        self.fitness_scaler = Some(scaler);
        self
    }

    /// Uses `selector` for both survivors and offspring.
    pub fn with_selector(mut self, selector: Arc<dyn Selector<C, F>>) -> Self {
        self.survivor_selector = Some(Arc::clone(&selector));
        self.offspring_selector = Some(selector);
        self
    }

    pub fn with_survivor_selector(mut self, selector: Arc<dyn Selector<C, F>>) -> Self {
        self.survivor_selector = Some(selector);
        self
    }

    pub fn with_offspring_selector(mut self, selector: Arc<dyn Selector<C, F>>) -> Self {
        self.offspring_selector = Some(selector);
        self
    }

    /// Appends `alterer` to the alteration pipeline. The default pipeline is only
    /// used if no alterer is added.
    pub fn with_alterer(mut self, alterer: Arc<dyn Alterer<C, F>>) -> Self {
        self.alterers.get_or_insert_with(Vec::new).push(alterer);
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator<C, F>>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_statistics_calculator(mut self, calculator: StatisticsCalculator) -> Self {
        self.statistics_calculator = Some(calculator);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Overrides the direction of `with_options`.
    pub fn with_optimize(mut self, optimize: Optimize) -> Self {
        self.optimize = Some(optimize);
        self
    }

    /// Overrides the logging level of `with_options`.
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = Some(log_level);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seeds the initial population with `genotypes`.
    pub fn with_genotypes(mut self, genotypes: Vec<Genotype<C>>) -> Self {
        self.genotypes = Some(genotypes);
        self
    }

    /// Builds an `Engine` that is ready for [`setup`](Engine::setup).
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the genotype factory or the fitness
    /// function is missing.
    pub fn build(self) -> Result<Engine<C, F>> {
        let factory = self.factory.ok_or_else(|| {
            GeneticError::Configuration("Genotype factory not specified".to_string())
        })?;

        let fitness_function = self.fitness_function.ok_or_else(|| {
            GeneticError::Configuration("Fitness function not specified".to_string())
        })?;

        let mut engine = Engine::new(factory, fitness_function);

        if let Some(scaler) = self.fitness_scaler {
            engine.set_fitness_scaler(scaler);
        }
        if let Some(selector) = self.survivor_selector {
            engine.set_survivor_selector(selector);
        }
        if let Some(selector) = self.offspring_selector {
            engine.set_offspring_selector(selector);
        }
        if let Some(alterers) = self.alterers {
            engine.set_alterers(alterers);
        }
        if let Some(evaluator) = self.evaluator {
            engine.set_evaluator(evaluator);
        }
        if let Some(calculator) = self.statistics_calculator {
            engine.set_statistics_calculator(calculator);
        }
        if let Some(options) = self.options {
            engine.set_options(options);
        }
        if let Some(optimize) = self.optimize {
            engine.set_optimize(optimize);
        }
        if let Some(log_level) = self.log_level {
            engine.set_log_level(log_level);
        }
        if let Some(seed) = self.seed {
            engine.set_rng(RandomNumberGenerator::from_seed(seed));
        }
        if let Some(genotypes) = self.genotypes {
            engine.set_genotypes(genotypes)?;
        }

        Ok(engine)
    }
}

impl<C: Chromosome, F: Fitness> Default for EngineBuilder<C, F> {
    fn default() -> Self {
        Self::new()
    }
}
