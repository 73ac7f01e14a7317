//! # Representation
//!
//! Genes, chromosomes and genotypes: the immutable values the engine searches over.
//! The bit, permutation and floating point encodings are reference implementations
//! of [`Chromosome`]; embedders supply their own the same way.

pub mod bit;
pub mod chromosome;
pub mod double;
pub mod gene;
pub mod genotype;
pub mod permutation;

pub use bit::{BitChromosome, BitGene};
pub use chromosome::{Chromosome, GeneSeq};
pub use double::{DoubleChromosome, DoubleGene};
pub use gene::{Gene, Mean, NumericGene};
pub use genotype::{GenotypeFactory, Genotype};
pub use permutation::{PermutationChromosome, PermutationGene};
