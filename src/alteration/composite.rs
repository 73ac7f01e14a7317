use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use tracing::trace;

use super::Alterer;
use crate::error::Result;
use crate::fitness::Fitness;
use crate::genetics::Chromosome;
use crate::population::Population;

/// Applies an ordered list of alterers to the same population.
///
/// Composites passed in are replaced by their stages, so the list is always flat and
/// the execution order equals the order of a depth-first walk over the nesting.
pub struct CompositeAlterer<C: Chromosome, F: Fitness> {
    alterers: Vec<Arc<dyn Alterer<C, F>>>,
}

impl<C: Chromosome, F: Fitness> CompositeAlterer<C, F> {
    pub fn new(alterers: Vec<Arc<dyn Alterer<C, F>>>) -> Self {
        let mut flat = Vec::with_capacity(alterers.len());
        for alterer in alterers {
            push_flat(&mut flat, alterer);
        }
        Self { alterers: flat }
    }

    /// A composite running `first` and then `second`.
    pub fn join(first: Arc<dyn Alterer<C, F>>, second: Arc<dyn Alterer<C, F>>) -> Self {
        Self::new(vec![first, second])
    }

    /// Appends `alterer` to the end of the pipeline.
    pub fn append(mut self, alterer: Arc<dyn Alterer<C, F>>) -> Self {
        push_flat(&mut self.alterers, alterer);
        self
    }

    pub fn alterers(&self) -> &[Arc<dyn Alterer<C, F>>] {
        &self.alterers
    }

    pub fn len(&self) -> usize {
        self.alterers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alterers.is_empty()
    }
}

fn push_flat<C: Chromosome, F: Fitness>(
    flat: &mut Vec<Arc<dyn Alterer<C, F>>>,
    alterer: Arc<dyn Alterer<C, F>>,
) {
    match alterer.components() {
        Some(parts) => flat.extend(parts.iter().cloned()),
        None => flat.push(alterer),
    }
}

impl<C: Chromosome, F: Fitness> Alterer<C, F> for CompositeAlterer<C, F> {
    fn alter(
        &self,
        population: &mut Population<C, F>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        let mut altered = 0;
        for alterer in &self.alterers {
            let count = alterer.alter(population, generation, rng)?;
            trace!(alterer = ?alterer, count, "Applied alterer");
            altered += count;
        }
        Ok(altered)
    }

    fn components(&self) -> Option<&[Arc<dyn Alterer<C, F>>]> {
        Some(&self.alterers)
    }
}

impl<C: Chromosome, F: Fitness> Clone for CompositeAlterer<C, F> {
    fn clone(&self) -> Self {
        Self {
            alterers: self.alterers.clone(),
        }
    }
}

impl<C: Chromosome, F: Fitness> Default for CompositeAlterer<C, F> {
    fn default() -> Self {
        Self {
            alterers: Vec::new(),
        }
    }
}

impl<C: Chromosome, F: Fitness> fmt::Debug for CompositeAlterer<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.alterers.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::genetics::DoubleChromosome;
    use crate::population::test_support::population_of;
    use crate::rng::RandomNumberGenerator;

    /// Records its id into a shared log and reports one alteration.
    #[derive(Debug)]
    struct Probe {
        id: usize,
        log: Arc<Mutex<Vec<usize>>>,
    }

    impl Alterer<DoubleChromosome, f64> for Probe {
        fn alter(
            &self,
            _population: &mut Population<DoubleChromosome, f64>,
            _generation: usize,
            _rng: &mut dyn RngCore,
        ) -> Result<usize> {
            self.log.lock().unwrap().push(self.id);
            Ok(1)
        }
    }

    fn probe(id: usize, log: &Arc<Mutex<Vec<usize>>>) -> Arc<dyn Alterer<DoubleChromosome, f64>> {
        Arc::new(Probe {
            id,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn test_flattening_preserves_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let inner = CompositeAlterer::new(vec![probe(2, &log), probe(3, &log)]);
        let nested = CompositeAlterer::<DoubleChromosome, f64>::join(Arc::new(inner), probe(4, &log));
        let composite =
            CompositeAlterer::<DoubleChromosome, f64>::new(vec![probe(1, &log), Arc::new(nested)])
            .append(probe(5, &log));

        assert_eq!(composite.len(), 5);
        assert!(composite.alterers().iter().all(|a| a.components().is_none()));

        let mut population = population_of(&[1.0, 2.0]);
        let mut rng = RandomNumberGenerator::from_seed(0);
        let altered = composite.alter(&mut population, 1, &mut rng).unwrap();

        assert_eq!(altered, 5);
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_composite_alters_nothing() {
        let composite = CompositeAlterer::<DoubleChromosome, f64>::default();
        let mut population = population_of(&[1.0]);
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert_eq!(composite.alter(&mut population, 1, &mut rng).unwrap(), 0);
        assert!(composite.is_empty());
    }
}
