use rand::seq::index;
use rand::RngCore;

use super::Selector;
use crate::error::{GeneticError, Result};
use crate::fitness::{Fitness, Optimize};
use crate::genetics::Chromosome;
use crate::population::Population;

/// A selection strategy that selects individuals through tournament selection.
///
/// Each draw holds a tournament between `k` distinct individuals, chosen uniformly
/// without replacement, and selects its winner. Tournaments are independent, so the
/// same individual may win several times.
///
/// Smaller tournaments lead to more exploration, larger ones to more exploitation.
/// With `k` equal to the population size every tournament is won by the best
/// individual; larger values of `k` are clamped to the population size.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TournamentSelectorConfig")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelector {
    tournament_size: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TournamentSelectorConfig {
    tournament_size: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<TournamentSelectorConfig> for TournamentSelector {
    type Error = GeneticError;

    fn try_from(config: TournamentSelectorConfig) -> Result<Self> {
        Self::new(config.tournament_size)
    }
}

impl TournamentSelector {
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

impl<C: Chromosome, F: Fitness> Selector<C, F> for TournamentSelector {
    fn select(
        &self,
        population: &Population<C, F>,
        count: usize,
        optimize: Optimize,
        rng: &mut dyn RngCore,
    ) -> Result<Population<C, F>> {
        if count == 0 {
            return Ok(Population::new());
        }
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let size = population.len();
        let k = self.tournament_size.min(size);

        let mut selection = Population::with_capacity(count);
        for _ in 0..count {
            let mut participants = index::sample(&mut *rng, size, k).into_iter();
            let mut winner = participants.next().unwrap_or(0);
            for challenger in participants {
                if optimize.is_better(
                    &population[challenger].fitness(),
                    &population[winner].fitness(),
                ) {
                    winner = challenger;
                }
            }
            selection.push(population[winner].clone());
        }
        Ok(selection)
    }
}
