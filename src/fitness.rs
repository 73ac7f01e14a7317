//! # Fitness
//!
//! The fitness side of the engine: the [`Fitness`] value type, the optimisation
//! direction and the embedder-supplied [`FitnessFunction`] and [`FitnessScaler`].
//!
//! Closures implement both traits, so a fitness function is usually written inline:
//!
//! ```rust
//! use genforge::fitness::{FitnessFunction, FitnessScaler};
//! use genforge::genetics::{BitChromosome, Genotype};
//!
//! let popcount = |gt: &Genotype<BitChromosome>| gt.chromosome(0).count_ones();
//! let genotype = Genotype::single(BitChromosome::from_bits(&[true, false, true]).unwrap());
//! assert_eq!(popcount.fitness(&genotype), 2);
//!
//! let doubled = |fitness: usize| fitness * 2;
//! assert_eq!(doubled.scale(2), 4);
//! ```

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::genetics::{Chromosome, Genotype};

/// A fitness value. Needs a (partial) order and a numeric view for the selectors
/// and statistics that work on magnitudes.
pub trait Fitness: Copy + Debug + PartialOrd + Send + Sync + 'static {
    /// Numeric view of the value.
    fn to_f64(self) -> f64;

    /// Total order over fitness values; NaN compares lowest.
    fn cmp_fitness(&self, other: &Self) -> Ordering {
        match self.partial_cmp(other) {
            Some(ordering) => ordering,
            None => {
                let (a, b) = (self.to_f64().is_nan(), other.to_f64().is_nan());
                match (a, b) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            }
        }
    }
}

macro_rules! impl_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_fitness!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// The optimisation direction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Optimize {
    Minimum,
    #[default]
    Maximum,
}

impl Optimize {
    /// Compares two fitness values so that the better one is `Greater`.
    pub fn compare<F: Fitness>(self, a: &F, b: &F) -> Ordering {
        match self {
            Optimize::Maximum => a.cmp_fitness(b),
            Optimize::Minimum => b.cmp_fitness(a),
        }
    }

    /// `true` if `a` is strictly better than `b`.
    pub fn is_better<F: Fitness>(self, a: &F, b: &F) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// Maps a genotype to its raw fitness. Must be free of side effects; it may be
/// called from worker threads.
pub trait FitnessFunction<C: Chromosome, F: Fitness>: Send + Sync {
    fn fitness(&self, genotype: &Genotype<C>) -> F;
}

impl<C, F, T> FitnessFunction<C, F> for T
where
    C: Chromosome,
    F: Fitness,
    T: Fn(&Genotype<C>) -> F + Send + Sync,
{
    fn fitness(&self, genotype: &Genotype<C>) -> F {
        self(genotype)
    }
}

/// Rescales a raw fitness value. Phenotypes are ordered by the scaled value.
pub trait FitnessScaler<F: Fitness>: Send + Sync {
    fn scale(&self, fitness: F) -> F;
}

/// Leaves the fitness untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScaler;

impl<F: Fitness> FitnessScaler<F> for IdentityScaler {
    fn scale(&self, fitness: F) -> F {
        fitness
    }
}

impl<F, T> FitnessScaler<F> for T
where
    F: Fitness,
    T: Fn(F) -> F + Send + Sync,
{
    fn scale(&self, fitness: F) -> F {
        self(fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_compares_lowest() {
        assert_eq!(f64::NAN.cmp_fitness(&1.0), Ordering::Less);
        assert_eq!(1.0.cmp_fitness(&f64::NAN), Ordering::Greater);
        assert_eq!(f64::NAN.cmp_fitness(&f64::NAN), Ordering::Equal);
        assert_eq!(3u32.cmp_fitness(&2u32), Ordering::Greater);
    }

    #[test]
    fn test_optimize_direction() {
        assert!(Optimize::Maximum.is_better(&5, &3));
        assert!(!Optimize::Maximum.is_better(&3, &3));
        assert!(Optimize::Minimum.is_better(&3.0, &5.0));
        assert_eq!(Optimize::default(), Optimize::Maximum);
    }

    #[test]
    fn test_identity_scaler() {
        assert_eq!(IdentityScaler.scale(4.5), 4.5);
    }
}
