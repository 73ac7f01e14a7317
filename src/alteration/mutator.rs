//! Mutation operators.
//!
//! Every mutator visits each individual once. An individual with a genotype of `L`
//! chromosomes is mutated with probability `p / L`; a mutation picks one random
//! chromosome and changes it, and the individual is replaced by a new phenotype of
//! the current generation. The returned count is the number of changed genes.

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use super::Alterer;
use crate::error::{Result, ResultExt};
use crate::fitness::Fitness;
use crate::genetics::{Chromosome, Gene, NumericGene};
use crate::population::Population;
use crate::probability::Probability;

/// Visits every individual and replaces the ones `mutate` changed.
fn mutate_population<C, F, M>(
    population: &mut Population<C, F>,
    generation: usize,
    probability: Probability,
    rng: &mut dyn RngCore,
    mut mutate: M,
) -> Result<usize>
where
    C: Chromosome,
    F: Fitness,
    M: FnMut(&C, &mut dyn RngCore) -> Result<Option<(C, usize)>>,
{
    let mut altered = 0;
    for i in 0..population.len() {
        let phenotype = &population[i];
        let genotype = phenotype.genotype();
        if rng.gen::<f64>() >= probability.value() / genotype.len() as f64 {
            continue;
        }

        let index = rng.gen_range(0..genotype.len());
        if let Some((chromosome, changed)) = mutate(genotype.chromosome(index), &mut *rng)? {
            let child =
                phenotype.new_instance(genotype.with_chromosome(index, chromosome), generation);
            population.set(i, child);
            altered += changed;
        }
    }
    Ok(altered)
}

/// Replaces one random gene of the chosen chromosome by a new random gene of the
/// same kind.
#[derive(Debug, Clone, Copy)]
pub struct Mutator {
    probability: Probability,
}

impl Mutator {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self::from_probability(Probability::new(probability)?))
    }

    pub fn from_probability(probability: Probability) -> Self {
        Self { probability }
    }

    pub fn probability(&self) -> Probability {
        self.probability
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for Mutator {
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        mutate_population(population, generation, self.probability, rng, |chromosome, rng| {
            let index = rng.gen_range(0..chromosome.len());
            let mut genes = chromosome.genes().to_vec();
            genes[index] = genes[index].new_instance(rng);
            Ok(Some((chromosome.with_genes(genes), 1)))
        })
    }
}

/// Swaps genes within the chosen chromosome: every position takes part in a swap
/// with a random other position with probability `p`. The multiset of alleles is
/// preserved, so permutations stay permutations.
#[derive(Debug, Clone, Copy)]
pub struct SwapMutator {
    probability: Probability,
}

impl SwapMutator {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self::from_probability(Probability::new(probability)?))
    }

    pub fn from_probability(probability: Probability) -> Self {
        Self { probability }
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for SwapMutator {
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        let p = self.probability.value();
        mutate_population(population, generation, self.probability, rng, |chromosome, rng| {
            let length = chromosome.len();
            if length < 2 {
                return Ok(None);
            }

            let mut genes = chromosome.genes().to_vec();
            let mut swaps = 0;
            for i in 0..length {
                if rng.gen::<f64>() < p {
                    let j = rng.gen_range(0..length);
                    genes.swap(i, j);
                    swaps += 1;
                }
            }
            Ok((swaps > 0).then(|| (chromosome.with_genes(genes), swaps)))
        })
    }
}

/// Adds a Gaussian distributed delta to one random numeric gene of the chosen
/// chromosome. The standard deviation is a quarter of the gene's range and the new
/// value is clamped to `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct GaussianMutator {
    probability: Probability,
}

impl GaussianMutator {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `probability` is not in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self::from_probability(Probability::new(probability)?))
    }

    pub fn from_probability(probability: Probability) -> Self {
        Self { probability }
    }
}

fn gaussian<G: NumericGene>(gene: &G, rng: &mut dyn RngCore) -> Result<G> {
    let std_dev = (gene.max() - gene.min()) * 0.25;
    let normal = Normal::new(0.0, std_dev).context("Invalid Gaussian mutation range")?;
    Ok(gene.with_value(gene.value() + normal.sample(&mut *rng)))
}

impl<C, F> Alterer<C, F> for GaussianMutator
where
    C: Chromosome,
    C::Gene: NumericGene,
    F: Fitness,
{
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        mutate_population(population, generation, self.probability, rng, |chromosome, rng| {
            let index = rng.gen_range(0..chromosome.len());
            let mut genes = chromosome.genes().to_vec();
            genes[index] = gaussian(&genes[index], rng)?;
            Ok(Some((chromosome.with_genes(genes), 1)))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fitness::IdentityScaler;
    use crate::genetics::{BitChromosome, DoubleChromosome, Genotype, PermutationChromosome};
    use crate::phenotype::Phenotype;
    use crate::population::test_support::population_of;
    use crate::rng::RandomNumberGenerator;

    fn bit_population(size: usize) -> Population<BitChromosome, usize> {
        (0..size)
            .map(|_| {
                Phenotype::<BitChromosome, usize>::new(
                    Genotype::single(BitChromosome::from_bits(&[false; 8]).unwrap()),
                    Arc::new(|gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones()),
                    Arc::new(IdentityScaler),
                    0,
                )
            })
            .collect()
    }

    #[test]
    fn test_mutation_rate_converges() {
        let mut rng = RandomNumberGenerator::from_seed(1234);
        let p = 0.3;
        let mutator = Mutator::new(p).unwrap();

        let trials = 20;
        let size = 1000;
        let mut altered = 0;
        for generation in 1..=trials {
            let mut population = bit_population(size);
            altered += mutator.alter(&mut population, generation, &mut rng).unwrap();
        }

        let rate = altered as f64 / (trials * size) as f64;
        assert!((rate - p).abs() < 0.02, "rate {}", rate);
    }

    #[test]
    fn test_probability_is_divided_by_genotype_length() {
        let mut rng = RandomNumberGenerator::from_seed(8);
        let mutator = Mutator::new(1.0).unwrap();
        let template = Genotype::new(vec![
            BitChromosome::from_bits(&[false; 4]).unwrap(),
            BitChromosome::from_bits(&[false; 4]).unwrap(),
        ])
        .unwrap();

        let size = 4000;
        let mut population: Population<BitChromosome, usize> = (0..size)
            .map(|_| {
                Phenotype::<BitChromosome, usize>::new(
                    template.clone(),
                    Arc::new(|gt: &Genotype<BitChromosome>| gt.gene_count()),
                    Arc::new(IdentityScaler),
                    0,
                )
            })
            .collect();

        let altered = mutator.alter(&mut population, 1, &mut rng).unwrap();
        let rate = altered as f64 / size as f64;
        assert!((rate - 0.5).abs() < 0.04, "rate {}", rate);
    }

    #[test]
    fn test_swap_preserves_permutations() {
        let mut rng = RandomNumberGenerator::from_seed(31);
        let mut population: Population<PermutationChromosome, usize> = (0..50)
            .map(|_| {
                Phenotype::<PermutationChromosome, usize>::new(
                    Genotype::single(PermutationChromosome::new(10, &mut rng).unwrap()),
                    Arc::new(|gt: &Genotype<PermutationChromosome>| gt.chromosome(0).alleles()[0]),
                    Arc::new(IdentityScaler),
                    0,
                )
            })
            .collect();

        let mutator = SwapMutator::new(0.8).unwrap();
        for generation in 1..=20 {
            mutator.alter(&mut population, generation, &mut rng).unwrap();
        }

        for phenotype in &population {
            assert!(phenotype.is_valid());
            let mut alleles = phenotype.genotype().chromosome(0).alleles();
            alleles.sort_unstable();
            assert_eq!(alleles, (0..10).collect::<Vec<_>>());
        }
        assert!(population.iter().any(|p| p.generation() > 0));
    }

    #[test]
    fn test_gaussian_stays_in_bounds() {
        let mut rng = RandomNumberGenerator::from_seed(71);
        let mut population = population_of(&[0.0; 200]);
        let mutator = GaussianMutator::new(1.0).unwrap();

        let altered = mutator.alter(&mut population, 1, &mut rng).unwrap();
        assert_eq!(altered, 200);
        for phenotype in &population {
            let chromosome: &DoubleChromosome = phenotype.genotype().chromosome(0);
            assert!(chromosome.is_valid());
        }
        assert!(population.iter().any(|p| p.genotype().chromosome(0).values()[0] != 0.0));
    }

    #[test]
    fn test_invalid_probability_is_rejected() {
        assert!(Mutator::new(1.5).is_err());
        assert!(SwapMutator::new(-0.1).is_err());
        assert!(GaussianMutator::new(f64::NAN).is_err());
    }
}
