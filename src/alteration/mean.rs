use rand::RngCore;

use super::recombinator::{chromosome_index, recombine_population, Recombinator};
use super::Alterer;
use crate::concurrency::Executor;
use crate::error::Result;
use crate::fitness::Fitness;
use crate::genetics::{Chromosome, Genotype, Mean};
use crate::population::Population;
use crate::probability::Probability;

/// Replaces the genes of the same random chromosome of both partners by the
/// gene-wise mean of the two. Works for every gene type that implements [`Mean`].
#[derive(Debug, Clone)]
pub struct MeanAlterer {
    probability: Probability,
    executor: Executor,
}

impl MeanAlterer {
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

impl<C> Recombinator<C> for MeanAlterer
where
    C: Chromosome,
    C::Gene: Mean,
{
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

        let mut genes = a.genes().to_vec();
        for (gene, other) in genes.iter_mut().zip(b.genes()) {
            *gene = gene.mean(other);
        }

        Some((
            first.with_chromosome(index, a.with_genes(genes.clone())),
            second.with_chromosome(index, b.with_genes(genes)),
        ))
    }
}

impl<C, F> Alterer<C, F> for MeanAlterer
where
    C: Chromosome,
    C::Gene: Mean,
    F: Fitness,
{
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        recombine_population(self, &self.executor, population, generation, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::DoubleChromosome;
    use crate::population::test_support::{fitness_of, population_of};
    use crate::rng::RandomNumberGenerator;

    #[test]
    fn test_partners_receive_mean() {
        let a = Genotype::single(DoubleChromosome::from_values(&[0.0, 4.0], -10.0, 10.0).unwrap());
        let b = Genotype::single(DoubleChromosome::from_values(&[2.0, -4.0], -10.0, 10.0).unwrap());
        let mut rng = RandomNumberGenerator::from_seed(6);

        let (x, y) = MeanAlterer::new(1.0).unwrap().recombine(&a, &b, &mut rng).unwrap();
        assert_eq!(x.chromosome(0).values(), vec![1.0, 0.0]);
        assert_eq!(y.chromosome(0).values(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_alter_replaces_pairs() {
        let mut population = population_of(&[0.0, 10.0]);
        let mut rng = RandomNumberGenerator::from_seed(6);

        let altered = MeanAlterer::new(1.0)
            .unwrap()
            .alter(&mut population, 2, &mut rng)
            .unwrap();
        assert_eq!(altered, 2);
        assert_eq!(fitness_of(&population), vec![5.0, 5.0]);
        assert!(population.iter().all(|p| p.generation() == 2));
    }
}
