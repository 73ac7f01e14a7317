use rand::{seq::SliceRandom, Rng, RngCore};

use super::chromosome::{Chromosome, GeneSeq};
use super::gene::Gene;
use crate::error::{GeneticError, Result};

/// One position of a permutation of `0..size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermutationGene {
    allele: usize,
    size: usize,
}

impl PermutationGene {
    pub fn allele(&self) -> usize {
        self.allele
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Gene for PermutationGene {
    fn is_valid(&self) -> bool {
        self.allele < self.size
    }

    fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        Self {
            allele: rng.gen_range(0..self.size),
            size: self.size,
        }
    }
}

/// A permutation of the alleles `0..len`. Valid only while no allele repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationChromosome {
    genes: GeneSeq<PermutationGene>,
}

impl PermutationChromosome {
    /// A random permutation of `0..length`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `length` is zero.
    pub fn new(length: usize, rng: &mut dyn RngCore) -> Result<Self> {
        if length == 0 {
            return Err(GeneticError::Configuration(
                "Permutation length must be greater than zero".to_string(),
            ));
        }
        let mut alleles: Vec<usize> = (0..length).collect();
        alleles.shuffle(rng);
        Self::from_alleles(alleles)
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `alleles` is empty.
    pub fn from_alleles(alleles: Vec<usize>) -> Result<Self> {
        let size = alleles.len();
        let genes = alleles
            .into_iter()
            .map(|allele| PermutationGene { allele, size })
            .collect();
        Ok(Self {
            genes: GeneSeq::new(genes)?,
        })
    }

    pub fn alleles(&self) -> Vec<usize> {
        self.genes.as_slice().iter().map(|g| g.allele).collect()
    }
}

impl Chromosome for PermutationChromosome {
    type Gene = PermutationGene;

    fn genes(&self) -> &[PermutationGene] {
        self.genes.as_slice()
    }

    fn with_genes(&self, genes: Vec<PermutationGene>) -> Self {
        Self {
            genes: GeneSeq::from(genes),
        }
    }

    fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        let mut genes = self.genes.as_slice().to_vec();
        genes.shuffle(rng);
        self.with_genes(genes)
    }

    fn is_valid(&self) -> bool {
        self.genes.is_valid_by(|genes| {
            let mut seen = vec![false; genes.len()];
            genes.iter().all(|gene| {
                gene.is_valid()
                    && gene.allele < seen.len()
                    && !std::mem::replace(&mut seen[gene.allele], true)
            })
        })
    }
}
