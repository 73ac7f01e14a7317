//! # Population
//!
//! An ordered, mutable sequence of [`Phenotype`]s. Not internally synchronized:
//! concurrent components only ever read it, or write to disjoint slots from the
//! calling thread after their workers have finished.

use std::ops::{Index, IndexMut};

use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::phenotype::Phenotype;

#[derive(Debug)]
pub struct Population<C: Chromosome, F: Fitness> {
    phenotypes: Vec<Phenotype<C, F>>,
}

impl<C: Chromosome, F: Fitness> Population<C, F> {
    pub fn new() -> Self {
        Self {
            phenotypes: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            phenotypes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.phenotypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phenotypes.is_empty()
    }

    pub fn push(&mut self, phenotype: Phenotype<C, F>) {
        self.phenotypes.push(phenotype);
    }

    pub fn get(&self, index: usize) -> Option<&Phenotype<C, F>> {
        self.phenotypes.get(index)
    }

    /// Replaces the phenotype at `index`, returning the old one.
    pub fn set(&mut self, index: usize, phenotype: Phenotype<C, F>) -> Phenotype<C, F> {
        std::mem::replace(&mut self.phenotypes[index], phenotype)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phenotype<C, F>> {
        self.phenotypes.iter()
    }

    pub fn as_slice(&self) -> &[Phenotype<C, F>] {
        &self.phenotypes
    }

    pub fn clear(&mut self) {
        self.phenotypes.clear();
    }

    /// Appends `count` phenotypes produced by `supplier`.
    pub fn fill(&mut self, count: usize, mut supplier: impl FnMut() -> Phenotype<C, F>) {
        self.phenotypes.reserve(count);
        for _ in 0..count {
            self.phenotypes.push(supplier());
        }
    }

    /// Sorts by scaled fitness, highest first.
    pub fn sort(&mut self) {
        self.sort_by_optimize(Optimize::Maximum);
    }

    /// Sorts best first with respect to `optimize`. The sort is stable.
    pub fn sort_by_optimize(&mut self, optimize: Optimize) {
        self.phenotypes
            .sort_by(|a, b| optimize.compare(&b.fitness(), &a.fitness()));
    }

    pub fn reverse(&mut self) {
        self.phenotypes.reverse();
    }

    pub fn into_vec(self) -> Vec<Phenotype<C, F>> {
        self.phenotypes
    }
}

impl<C: Chromosome, F: Fitness> Clone for Population<C, F> {
    fn clone(&self) -> Self {
        Self {
            phenotypes: self.phenotypes.clone(),
        }
    }
}

impl<C: Chromosome, F: Fitness> Default for Population<C, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Chromosome, F: Fitness> From<Vec<Phenotype<C, F>>> for Population<C, F> {
    fn from(phenotypes: Vec<Phenotype<C, F>>) -> Self {
        Self { phenotypes }
    }
}

impl<C: Chromosome, F: Fitness> FromIterator<Phenotype<C, F>> for Population<C, F> {
    fn from_iter<I: IntoIterator<Item = Phenotype<C, F>>>(iter: I) -> Self {
        Self {
            phenotypes: iter.into_iter().collect(),
        }
    }
}

impl<C: Chromosome, F: Fitness> Extend<Phenotype<C, F>> for Population<C, F> {
    fn extend<I: IntoIterator<Item = Phenotype<C, F>>>(&mut self, iter: I) {
        self.phenotypes.extend(iter);
    }
}

impl<C: Chromosome, F: Fitness> IntoIterator for Population<C, F> {
    type Item = Phenotype<C, F>;
    type IntoIter = std::vec::IntoIter<Phenotype<C, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.phenotypes.into_iter()
    }
}

impl<'a, C: Chromosome, F: Fitness> IntoIterator for &'a Population<C, F> {
    type Item = &'a Phenotype<C, F>;
    type IntoIter = std::slice::Iter<'a, Phenotype<C, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.phenotypes.iter()
    }
}

impl<C: Chromosome, F: Fitness> Index<usize> for Population<C, F> {
    type Output = Phenotype<C, F>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.phenotypes[index]
    }
}

impl<C: Chromosome, F: Fitness> IndexMut<usize> for Population<C, F> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.phenotypes[index]
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{fitness_of, population_of};
    use super::*;

    #[test]
    fn test_sort_is_non_increasing() {
        let mut population = population_of(&[3.0, -1.0, 7.5, 0.0, 7.5, 2.0]);
        population.sort();
        let fitness = fitness_of(&population);
        assert!(fitness.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(fitness[0], 7.5);
    }

    #[test]
    fn test_sort_minimum_and_reverse() {
        let mut population = population_of(&[3.0, -1.0, 7.5]);
        population.sort_by_optimize(Optimize::Minimum);
        assert_eq!(fitness_of(&population), vec![-1.0, 3.0, 7.5]);
        population.reverse();
        assert_eq!(fitness_of(&population), vec![7.5, 3.0, -1.0]);
    }

    #[test]
    fn test_set_and_fill() {
        let mut population = population_of(&[1.0, 2.0]);
        let replacement = population_of(&[9.0]).into_vec().remove(0);
        let old = population.set(0, replacement);
        assert_eq!(old.fitness(), 1.0);
        assert_eq!(population[0].fitness(), 9.0);

        let template = population[1].clone();
        population.fill(3, || template.clone());
        assert_eq!(population.len(), 5);
    }
}
