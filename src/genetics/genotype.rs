use std::sync::{Arc, OnceLock};

use rand::RngCore;

use super::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

/// An ordered, fixed-length, non-empty sequence of chromosomes: one candidate
/// solution.
///
/// Chromosomes of different concrete kinds are expressed by a chromosome enum that
/// implements [`Chromosome`]. Cloning is cheap; the chromosomes are shared.
#[derive(Clone, Debug)]
pub struct Genotype<C: Chromosome> {
    chromosomes: Arc<[C]>,
    valid: OnceLock<bool>,
}

impl<C: Chromosome> Genotype<C> {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `chromosomes` is empty.
    pub fn new(chromosomes: Vec<C>) -> Result<Self> {
        if chromosomes.is_empty() {
            return Err(GeneticError::Configuration(
                "A genotype must contain at least one chromosome".to_string(),
            ));
        }
        Ok(Self::from_chromosomes(chromosomes))
    }

    /// A genotype with exactly one chromosome.
    pub fn single(chromosome: C) -> Self {
        Self::from_chromosomes(vec![chromosome])
    }

    fn from_chromosomes(chromosomes: Vec<C>) -> Self {
        Self {
            chromosomes: chromosomes.into(),
            valid: OnceLock::new(),
        }
    }

    pub fn chromosome(&self, index: usize) -> &C {
        &self.chromosomes[index]
    }

    pub fn chromosomes(&self) -> &[C] {
        &self.chromosomes
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Total number of genes over all chromosomes.
    pub fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::len).sum()
    }

    /// `true` if every chromosome is valid. Cached after the first call.
    pub fn is_valid(&self) -> bool {
        *self
            .valid
            .get_or_init(|| self.chromosomes.iter().all(Chromosome::is_valid))
    }

    /// Returns a new genotype with the chromosome at `index` replaced.
    pub fn with_chromosome(&self, index: usize, chromosome: C) -> Self {
        let mut chromosomes = self.chromosomes.to_vec();
        chromosomes[index] = chromosome;
        Self::from_chromosomes(chromosomes)
    }

    /// Creates a new random genotype with the same shape.
    pub fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        Self::from_chromosomes(
            self.chromosomes
                .iter()
                .map(|chromosome| chromosome.new_instance(rng))
                .collect(),
        )
    }
}

impl<C: Chromosome> PartialEq for Genotype<C> {
    fn eq(&self, other: &Self) -> bool {
        self.chromosomes.len() == other.chromosomes.len()
            && self
                .chromosomes
                .iter()
                .zip(other.chromosomes.iter())
                .all(|(a, b)| a.genes() == b.genes())
    }
}

/// Random sampler for the initial population and for replacing aged-out or invalid
/// survivors.
pub trait GenotypeFactory<C: Chromosome>: Send + Sync {
    fn new_genotype(&self, rng: &mut dyn RngCore) -> Genotype<C>;
}

/// A genotype is a factory for random genotypes of its own shape.
impl<C: Chromosome> GenotypeFactory<C> for Genotype<C> {
    fn new_genotype(&self, rng: &mut dyn RngCore) -> Genotype<C> {
        self.new_instance(rng)
    }
}

impl<C, T> GenotypeFactory<C> for T
where
    C: Chromosome,
    T: Fn(&mut dyn RngCore) -> Genotype<C> + Send + Sync,
{
    fn new_genotype(&self, rng: &mut dyn RngCore) -> Genotype<C> {
        self(rng)
    }
}
