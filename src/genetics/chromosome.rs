use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

use rand::RngCore;

use super::gene::Gene;
use crate::error::{GeneticError, Result};

/// An ordered, fixed-length, non-empty sequence of genes of one kind.
///
/// Chromosomes are immutable. Operators read the genes, build a new gene vector
/// and ask the chromosome for a new instance of the same kind via
/// [`with_genes`](Chromosome::with_genes).
pub trait Chromosome: Clone + Debug + Send + Sync + 'static {
    type Gene: Gene;

    fn genes(&self) -> &[Self::Gene];

    /// Creates a chromosome of the same kind holding `genes`.
    fn with_genes(&self, genes: Vec<Self::Gene>) -> Self;

    /// Creates a new random chromosome of the same kind and length.
    fn new_instance(&self, rng: &mut dyn RngCore) -> Self;

    /// `true` if every gene is valid and any chromosome-wide constraint holds.
    fn is_valid(&self) -> bool;

    fn len(&self) -> usize {
        self.genes().len()
    }

    fn is_empty(&self) -> bool {
        self.genes().is_empty()
    }

    fn gene(&self, index: usize) -> &Self::Gene {
        &self.genes()[index]
    }
}

/// Shared gene storage for chromosome implementations.
///
/// The validity check scans the whole sequence, so its result is computed once and
/// cached.
#[derive(Clone, Debug)]
pub struct GeneSeq<G: Gene> {
    genes: Arc<[G]>,
    valid: OnceLock<bool>,
}

impl<G: Gene> GeneSeq<G> {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `genes` is empty.
    pub fn new(genes: Vec<G>) -> Result<Self> {
        if genes.is_empty() {
            return Err(GeneticError::Configuration(
                "A chromosome must contain at least one gene".to_string(),
            ));
        }
        Ok(Self::from(genes))
    }

    pub fn as_slice(&self) -> &[G] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene-wise validity, cached.
    pub fn is_valid(&self) -> bool {
        self.is_valid_by(|genes| genes.iter().all(Gene::is_valid))
    }

    /// Validity under a custom predicate, cached after the first call.
    pub fn is_valid_by(&self, check: impl FnOnce(&[G]) -> bool) -> bool {
        *self.valid.get_or_init(|| check(&self.genes))
    }
}

impl<G: Gene> From<Vec<G>> for GeneSeq<G> {
    fn from(genes: Vec<G>) -> Self {
        Self {
            genes: genes.into(),
            valid: OnceLock::new(),
        }
    }
}

impl<G: Gene> PartialEq for GeneSeq<G> {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}
