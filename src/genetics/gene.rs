use std::fmt::Debug;

use rand::RngCore;

/// The smallest encoded unit. Immutable; alterers replace genes, they never
/// modify them in place.
pub trait Gene: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// `true` if the allele lies inside the gene's domain.
    fn is_valid(&self) -> bool;

    /// Creates a new random gene of the same kind and domain.
    fn new_instance(&self, rng: &mut dyn RngCore) -> Self;
}

/// Genes that can be averaged with a gene of the same kind.
pub trait Mean {
    fn mean(&self, other: &Self) -> Self;
}

/// Genes carrying a bounded numeric allele.
pub trait NumericGene: Gene {
    fn value(&self) -> f64;

    /// Inclusive lower bound of the domain.
    fn min(&self) -> f64;

    /// Inclusive upper bound of the domain.
    fn max(&self) -> f64;

    /// Creates a gene of the same domain with the given value clamped into `[min, max]`.
    fn with_value(&self, value: f64) -> Self;
}
