//! # genforge
//!
//! A generic generational evolutionary-optimization engine. Candidate solutions are
//! encoded as [`Genotype`]s of [`Chromosome`]s, judged by a fitness function and
//! improved over generations by pluggable [`Selector`]s and [`Alterer`]s. Fitness
//! evaluation, statistics and pairwise recombination may run on a rayon pool.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use genforge::alteration::{Mutator, SinglePointCrossover};
//! use genforge::evolution::EngineBuilder;
//! use genforge::genetics::{BitChromosome, Genotype};
//! use genforge::selection::TournamentSelector;
//! use rand::RngCore;
//!
//! let mut engine = EngineBuilder::<BitChromosome, usize>::new()
//!     .with_factory(Arc::new(|rng: &mut dyn RngCore| {
//!         Genotype::single(BitChromosome::new(16, rng).expect("non-empty chromosome"))
//!     }))
//!     .with_fitness_function(Arc::new(|gt: &Genotype<BitChromosome>| {
//!         gt.chromosome(0).count_ones()
//!     }))
//!     .with_selector(Arc::new(TournamentSelector::new(3).unwrap()))
//!     .with_alterer(Arc::new(SinglePointCrossover::new(0.2).unwrap()))
//!     .with_alterer(Arc::new(Mutator::new(0.1).unwrap()))
//!     .with_seed(7)
//!     .build()
//!     .unwrap();
//!
//! engine.setup().unwrap();
//! engine.evolve_n(20).unwrap();
//! assert!(engine.best_fitness().unwrap() <= 16);
//! ```

pub mod alteration;
pub mod concurrency;
pub mod error;
pub mod evaluation;
pub mod evolution;
pub mod fitness;
pub mod genetics;
pub mod phenotype;
pub mod population;
pub mod probability;
pub mod rng;
pub mod selection;
pub mod statistics;

// Re-export commonly used types for convenience
pub use alteration::{Alterer, CompositeAlterer};
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{Engine, EngineBuilder, EngineOptions, LogLevel};
pub use fitness::{Fitness, FitnessFunction, FitnessScaler, Optimize};
pub use genetics::{Chromosome, Gene, Genotype, GenotypeFactory};
pub use phenotype::Phenotype;
pub use population::Population;
pub use probability::Probability;
pub use selection::Selector;
pub use statistics::Statistics;
