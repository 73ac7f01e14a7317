//! # Alteration
//!
//! An [`Alterer`] changes a population in place: crossover and mean alterers
//! recombine pairs of individuals, mutators change single individuals. Altered
//! individuals are replaced by new, unevaluated phenotypes of the given generation;
//! the original phenotypes are never modified.
//!
//! Alterers are composed into a pipeline with [`CompositeAlterer`], which applies its
//! parts in order. Nested composites are flattened when they are built.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genforge::alteration::{Alterer, CompositeAlterer, Mutator, SinglePointCrossover};
//! use genforge::genetics::BitChromosome;
//!
//! let pipeline = CompositeAlterer::<BitChromosome, usize>::new(vec![
//!     Arc::new(SinglePointCrossover::new(0.1).unwrap()),
//!     Arc::new(Mutator::new(0.05).unwrap()),
//! ]);
//! assert_eq!(pipeline.len(), 2);
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use rand::RngCore;

use crate::error::Result;
use crate::fitness::Fitness;
use crate::genetics::Chromosome;
use crate::population::Population;

pub mod composite;
pub mod crossover;
pub mod mean;
pub mod mutator;
pub mod recombinator;

pub use composite::CompositeAlterer;
pub use crossover::{PartiallyMatchedCrossover, SinglePointCrossover};
pub use mean::MeanAlterer;
pub use mutator::{GaussianMutator, Mutator, SwapMutator};
pub use recombinator::Recombinator;

/// A probabilistic transformation of a population.
pub trait Alterer<C: Chromosome, F: Fitness>: Debug + Send + Sync {
    /// Alters `population` in place and returns the number of alterations.
    ///
    /// New phenotypes are created with `generation` as their birth generation.
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize>;

    /// The stages this alterer is made of, if it is a composite.
    fn components(&self) -> Option<&[Arc<dyn Alterer<C, F>>]> {
        None
    }
}
