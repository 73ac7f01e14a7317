use rand::{Rng, RngCore};

use super::chromosome::{Chromosome, GeneSeq};
use super::gene::Gene;
use crate::error::{GeneticError, Result};

/// A single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitGene(bool);

impl BitGene {
    pub fn new(bit: bool) -> Self {
        Self(bit)
    }

    pub fn bit(self) -> bool {
        self.0
    }
}

impl Gene for BitGene {
    fn is_valid(&self) -> bool {
        true
    }

    fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        Self(rng.gen_bool(0.5))
    }
}

/// A fixed-length bit string.
#[derive(Debug, Clone, PartialEq)]
pub struct BitChromosome {
    genes: GeneSeq<BitGene>,
}

impl BitChromosome {
    /// A random bit string of `length` bits.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `length` is zero.
    pub fn new(length: usize, rng: &mut dyn RngCore) -> Result<Self> {
        if length == 0 {
            return Err(GeneticError::Configuration(
                "Bit chromosome length must be greater than zero".to_string(),
            ));
        }
        let genes = (0..length).map(|_| BitGene(rng.gen_bool(0.5))).collect();
        Ok(Self {
            genes: GeneSeq::new(genes)?,
        })
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `bits` is empty.
    pub fn from_bits(bits: &[bool]) -> Result<Self> {
        if bits.is_empty() {
            return Err(GeneticError::Configuration(
                "Bit chromosome length must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            genes: GeneSeq::from(bits.iter().copied().map(BitGene).collect::<Vec<_>>()),
        })
    }

    pub fn bits(&self) -> Vec<bool> {
        self.genes.as_slice().iter().map(|g| g.0).collect()
    }

    pub fn count_ones(&self) -> usize {
        self.genes.as_slice().iter().filter(|g| g.0).count()
    }
}

impl Chromosome for BitChromosome {
    type Gene = BitGene;

    fn genes(&self) -> &[BitGene] {
        self.genes.as_slice()
    }

    fn with_genes(&self, genes: Vec<BitGene>) -> Self {
        Self {
            genes: GeneSeq::from(genes),
        }
    }

    fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        let genes = (0..self.genes.len())
            .map(|_| BitGene(rng.gen_bool(0.5)))
            .collect::<Vec<_>>();
        self.with_genes(genes)
    }

    fn is_valid(&self) -> bool {
        self.genes.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_zero_length_is_rejected() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        assert!(BitChromosome::new(0, &mut rng).is_err());
        assert!(matches!(
            BitChromosome::from_bits(&[]),
            Err(GeneticError::Configuration(_))
        ));
    }

    #[test]
    fn test_count_ones() {
        let chromosome = BitChromosome::from_bits(&[true, true, false, true]).unwrap();
        assert_eq!(chromosome.count_ones(), 3);
        assert_eq!(chromosome.len(), 4);
        assert!(chromosome.is_valid());
    }
}
