//! # Selection
//!
//! A [`Selector`] draws a new population of exactly `count` phenotypes from an
//! existing one. Except for [`TruncationSelector`], draws are made with replacement.
//!
//! Most strategies are fitness proportionate in some form and share the
//! [`ProbabilitySelector`] template: the strategy only computes one probability per
//! individual, the template turns them into draws.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genforge::fitness::{IdentityScaler, Optimize};
//! use genforge::genetics::{BitChromosome, Genotype};
//! use genforge::phenotype::Phenotype;
//! use genforge::population::Population;
//! use genforge::rng::RandomNumberGenerator;
//! use genforge::selection::{Selector, TournamentSelector};
//!
//! let population: Population<BitChromosome, usize> = [[true, true], [true, false], [false, false]]
//!     .iter()
//!     .map(|bits| {
//!         Phenotype::new(
//!             Genotype::single(BitChromosome::from_bits(bits).unwrap()),
//!             Arc::new(|gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones()),
//!             Arc::new(IdentityScaler),
//!             0,
//!         )
//!     })
//!     .collect();
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let selector = TournamentSelector::new(3).unwrap();
//! let selected = selector
//!     .select(&population, 4, Optimize::Maximum, &mut rng)
//!     .unwrap();
//!
//! assert_eq!(selected.len(), 4);
//! assert!(selected.iter().all(|p| p.fitness() == 2));
//! ```

use std::fmt::Debug;

use rand::RngCore;

use crate::error::Result;
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::population::Population;

pub mod boltzmann;
pub mod monte_carlo;
pub mod probability;
pub mod rank;
pub mod roulette;
pub mod stochastic_universal;
pub mod tournament;
pub mod truncation;

pub use boltzmann::BoltzmannSelector;
pub use monte_carlo::MonteCarloSelector;
pub use probability::ProbabilitySelector;
pub use rank::{ExponentialRankSelector, LinearRankSelector};
pub use roulette::RouletteWheelSelector;
pub use stochastic_universal::StochasticUniversalSelector;
pub use tournament::TournamentSelector;
pub use truncation::TruncationSelector;

/// Trait for selection strategies.
///
/// Implementations must not modify the given population and must return exactly
/// `count` phenotypes taken from it. A `count` of zero returns an empty population
/// without looking at the fitness of any individual.
pub trait Selector<C: Chromosome, F: Fitness>: Debug + Send + Sync {
    /// Selects `count` phenotypes from `population`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` if `count > 0` and the population is
    /// empty, or a strategy specific `GeneticError::Selection`.
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut dyn RngCore,
    ) -> Result<Population<C, F>>;
}
