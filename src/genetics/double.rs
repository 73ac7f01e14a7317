use rand::{Rng, RngCore};

use super::chromosome::{Chromosome, GeneSeq};
use super::gene::{Gene, Mean, NumericGene};
use crate::error::{GeneticError, Result};

/// A floating point allele in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleGene {
    value: f64,
    min: f64,
    max: f64,
}

impl DoubleGene {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `min >= max` or a bound is not finite.
    pub fn new(value: f64, min: f64, max: f64) -> Result<Self> {
        check_bounds(min, max)?;
        Ok(Self { value, min, max })
    }

    /// A uniformly distributed gene in `[min, max)`.
    pub fn random(min: f64, max: f64, rng: &mut dyn RngCore) -> Result<Self> {
        check_bounds(min, max)?;
        Ok(Self {
            value: rng.gen_range(min..max),
            min,
            max,
        })
    }
}

fn check_bounds(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(GeneticError::Configuration(format!(
            "Gene bounds must be finite with min < max, but were [{}, {}]",
            min, max
        )));
    }
    Ok(())
}

impl Gene for DoubleGene {
    fn is_valid(&self) -> bool {
        self.value.is_finite() && self.value >= self.min && self.value <= self.max
    }

    fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        Self {
            value: rng.gen_range(self.min..self.max),
            ..*self
        }
    }
}

impl Mean for DoubleGene {
    fn mean(&self, other: &Self) -> Self {
        self.with_value(self.value + (other.value - self.value) / 2.0)
    }
}

impl NumericGene for DoubleGene {
    fn value(&self) -> f64 {
        self.value
    }

    fn min(&self) -> f64 {
        self.min
    }

    fn max(&self) -> f64 {
        self.max
    }

    fn with_value(&self, value: f64) -> Self {
        Self {
            value: value.clamp(self.min, self.max),
            ..*self
        }
    }
}

/// A fixed-length vector of bounded floating point genes.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleChromosome {
    genes: GeneSeq<DoubleGene>,
}

impl DoubleChromosome {
    /// A random chromosome of `length` genes in `[min, max)`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `length` is zero or the bounds are invalid.
    pub fn new(length: usize, min: f64, max: f64, rng: &mut dyn RngCore) -> Result<Self> {
        if length == 0 {
            return Err(GeneticError::Configuration(
                "Double chromosome length must be greater than zero".to_string(),
            ));
        }
        let genes = (0..length)
            .map(|_| DoubleGene::random(min, max, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            genes: GeneSeq::new(genes)?,
        })
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `values` is empty or the bounds are invalid.
    pub fn from_values(values: &[f64], min: f64, max: f64) -> Result<Self> {
        let genes = values
            .iter()
            .map(|&value| DoubleGene::new(value, min, max))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            genes: GeneSeq::new(genes)?,
        })
    }

    pub fn values(&self) -> Vec<f64> {
        self.genes.as_slice().iter().map(|g| g.value).collect()
    }
}

impl Chromosome for DoubleChromosome {
    type Gene = DoubleGene;

    fn genes(&self) -> &[DoubleGene] {
        self.genes.as_slice()
    }

    fn with_genes(&self, genes: Vec<DoubleGene>) -> Self {
        Self {
            genes: GeneSeq::from(genes),
        }
    }

    fn new_instance(&self, rng: &mut dyn RngCore) -> Self {
        let genes = self
            .genes
            .as_slice()
            .iter()
            .map(|gene| gene.new_instance(rng))
            .collect();
        self.with_genes(genes)
    }

    fn is_valid(&self) -> bool {
        self.genes.is_valid()
    }
}
