use rand::{Rng, RngCore};

use super::recombinator::{chromosome_index, recombine_population, Recombinator};
use super::Alterer;
use crate::concurrency::Executor;
use crate::error::Result;
use crate::fitness::Fitness;
use crate::genetics::{Chromosome, Genotype, PermutationChromosome, PermutationGene};
use crate::population::Population;
use crate::probability::Probability;

/// Single point crossover.
///
/// Picks the same random chromosome in both partners and a random cut point `idx`,
/// then exchanges the genes `[0, idx]`. The cut never covers the whole chromosome,
/// so chromosomes of a single gene are left alone.
#[derive(Debug, Clone)]
pub struct SinglePointCrossover {
    probability: Probability,
    executor: Executor,
}

impl SinglePointCrossover {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self::from_probability(Probability::new(probability)?))
    }

    pub fn from_probability(probability: Probability) -> Self {
        Self {
            probability,
            executor: Executor::Inline,
        }
    }

    /// Recombines the pairs on `executor`.
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }
}

impl<C: Chromosome> Recombinator<C> for SinglePointCrossover {
    fn probability(&self) -> Probability {
        self.probability
    }

    fn recombine(
        &self,
        first: &Genotype<C>,
        second: &Genotype<C>,
        rng: &mut dyn RngCore,
    ) -> Option<(Genotype<C>, Genotype<C>)> {
        let index = chromosome_index(first, second, rng);
        let (a, b) = (first.chromosome(index), second.chromosome(index));
        let length = a.len().min(b.len());
        if length < 2 {
            return None;
        }

        let cut = rng.gen_range(0..length - 1);
        let mut x = a.genes().to_vec();
        let mut y = b.genes().to_vec();
        x[..=cut].swap_with_slice(&mut y[..=cut]);

        Some((
            first.with_chromosome(index, a.with_genes(x)),
            second.with_chromosome(index, b.with_genes(y)),
        ))
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for SinglePointCrossover {
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        recombine_population(self, &self.executor, population, generation, rng)
    }
}

/// Partially matched crossover (PMX) for permutations.
///
/// Exchanges the gene range `[i1, i2)` of the same random chromosome of both
/// partners, then repairs every gene outside the range that became a duplicate by
/// following the mapping of the exchanged range. Permutations stay permutations.
/// Chromosomes that are not valid permutations are left alone.
#[derive(Debug, Clone)]
pub struct PartiallyMatchedCrossover {
    probability: Probability,
    executor: Executor,
}

impl PartiallyMatchedCrossover {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self::from_probability(Probability::new(probability)?))
    }

    pub fn from_probability(probability: Probability) -> Self {
        Self {
            probability,
            executor: Executor::Inline,
        }
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }
}

/// Position of every allele of `genes[range]`, indexed by allele.
fn segment_positions(genes: &[PermutationGene], start: usize, end: usize) -> Vec<Option<usize>> {
    let mut positions = vec![None; genes.len()];
    for (position, gene) in genes.iter().enumerate().take(end).skip(start) {
        positions[gene.allele()] = Some(position);
    }
    positions
}

/// Replaces duplicates outside `[start, end)` of `child`; `donor` holds the genes
/// that were exchanged away.
fn repair(child: &mut [PermutationGene], donor: &[PermutationGene], start: usize, end: usize) {
    let positions = segment_positions(child, start, end);
    for i in (0..start).chain(end..child.len()) {
        let mut gene = child[i];
        // The mapping is a permutation of the segment, so the walk ends after at most
        // `end - start` steps.
        while let Some(position) = positions[gene.allele()] {
            gene = donor[position];
        }
        child[i] = gene;
    }
}

impl Recombinator<PermutationChromosome> for PartiallyMatchedCrossover {
    fn probability(&self) -> Probability {
        self.probability
    }

    fn recombine(
        &self,
        first: &Genotype<PermutationChromosome>,
        second: &Genotype<PermutationChromosome>,
        rng: &mut dyn RngCore,
    ) -> Option<(Genotype<PermutationChromosome>, Genotype<PermutationChromosome>)> {
        let index = chromosome_index(first, second, rng);
        let (a, b) = (first.chromosome(index), second.chromosome(index));
        let length = a.len();
        if length < 2 || b.len() != length || !a.is_valid() || !b.is_valid() {
            return None;
        }

        let mut start = rng.gen_range(0..length);
        let mut end = rng.gen_range(0..length);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        end += 1;

        let mut x = a.genes().to_vec();
        let mut y = b.genes().to_vec();
        x[start..end].swap_with_slice(&mut y[start..end]);
        repair(&mut x, &y, start, end);
        repair(&mut y, &x, start, end);

        Some((
            first.with_chromosome(index, a.with_genes(x)),
            second.with_chromosome(index, b.with_genes(y)),
        ))
    }
}

impl<F: Fitness> Alterer<PermutationChromosome, F> for PartiallyMatchedCrossover {
    fn alter(
        &self,
        population: &mut Population<PermutationChromosome, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        recombine_population(self, &self.executor, population, generation, rng)
    }
}
