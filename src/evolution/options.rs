//! # EngineOptions
//!
//! The `EngineOptions` struct holds the scalar configuration of an [`Engine`]:
//! population size, maximal phenotype age, survivor and offspring fractions,
//! optimization direction and logging level.
//!
//! ## Example
//!
//! ```rust
//! use genforge::evolution::options::{EngineOptions, LogLevel};
//! use genforge::fitness::Optimize;
//!
//! // Create options with a fluent builder
//! let options = EngineOptions::builder()
//!     .population_size(100)
//!     .maximal_phenotype_age(20)
//!     .survivor_fraction(0.3)
//!     .offspring_fraction(0.7)
//!     .optimize(Optimize::Minimum)
//!     .log_level(LogLevel::Minimal)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.survivors(), 30);
//! assert_eq!(options.offspring(), 70);
//!
//! // Create options with default parameters
//! let default_options = EngineOptions::default();
//! assert_eq!(default_options.population_size(), 50);
//! ```
//!
//! ## `LogLevel`
//!
//! - `Verbose`: logs every generation together with its statistics.
//! - `Minimal`: logs setup and a one line summary per generation.
//! - `None`: disables the engine's per-generation logging.
//!
//! [`Engine`]: crate::evolution::Engine

use crate::error::{GeneticError, Result};
use crate::fitness::Optimize;
use crate::probability::Probability;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Verbose,
    Minimal,
    #[default]
    None,
}

/// Deserialization validates like [`EngineOptionsBuilder::build`].
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "EngineOptionsConfig")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    population_size: usize,
    maximal_phenotype_age: usize,
    survivor_fraction: Probability,
    offspring_fraction: Probability,
    optimize: Optimize,
    log_level: LogLevel,
}

impl EngineOptions {
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `population_size` is zero or a fraction
    /// is not in `[0, 1]`.
    pub fn new(
        population_size: usize,
        maximal_phenotype_age: usize,
        survivor_fraction: f64,
        offspring_fraction: f64,
    ) -> Result<Self> {
        Self::builder()
            .population_size(population_size)
            .maximal_phenotype_age(maximal_phenotype_age)
            .survivor_fraction(survivor_fraction)
            .offspring_fraction(offspring_fraction)
            .build()
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn maximal_phenotype_age(&self) -> usize {
        self.maximal_phenotype_age
    }

    pub fn survivor_fraction(&self) -> Probability {
        self.survivor_fraction
    }

    pub fn offspring_fraction(&self) -> Probability {
        self.offspring_fraction
    }

    pub fn optimize(&self) -> Optimize {
        self.optimize
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Number of survivors selected per generation, `round(survivor_fraction * N)`.
    pub fn survivors(&self) -> usize {
        (self.survivor_fraction.value() * self.population_size as f64).round() as usize
    }

    /// Number of offspring selected per generation, `round(offspring_fraction * N)`.
    pub fn offspring(&self) -> usize {
        (self.offspring_fraction.value() * self.population_size as f64).round() as usize
    }

    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if `population_size` is zero.
    pub fn set_population_size(&mut self, population_size: usize) -> Result<()> {
        check_population_size(population_size)?;
        self.population_size = population_size;
        Ok(())
    }

    pub fn set_maximal_phenotype_age(&mut self, maximal_phenotype_age: usize) {
        self.maximal_phenotype_age = maximal_phenotype_age;
    }

    pub fn set_survivor_fraction(&mut self, fraction: Probability) {
        self.survivor_fraction = fraction;
    }

    pub fn set_offspring_fraction(&mut self, fraction: Probability) {
        self.offspring_fraction = fraction;
    }

    pub fn set_optimize(&mut self, optimize: Optimize) {
        self.optimize = optimize;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Returns a builder for creating an `EngineOptions` instance.
    pub fn builder() -> EngineOptionsBuilder {
        EngineOptionsBuilder::default()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct EngineOptionsConfig {
    population_size: usize,
    maximal_phenotype_age: usize,
    survivor_fraction: f64,
    offspring_fraction: f64,
    optimize: Optimize,
    log_level: LogLevel,
}

#[cfg(feature = "serde")]
impl TryFrom<EngineOptionsConfig> for EngineOptions {
    type Error = GeneticError;

    fn try_from(config: EngineOptionsConfig) -> Result<Self> {
        Self::builder()
            .population_size(config.population_size)
            .maximal_phenotype_age(config.maximal_phenotype_age)
            .survivor_fraction(config.survivor_fraction)
            .offspring_fraction(config.offspring_fraction)
            .optimize(config.optimize)
            .log_level(config.log_level)
            .build()
    }
}

fn check_population_size(population_size: usize) -> Result<()> {
    if population_size == 0 {
        return Err(GeneticError::Configuration(
            "Population size must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

const DEFAULT_POPULATION_SIZE: usize = 50;
const DEFAULT_MAXIMAL_PHENOTYPE_AGE: usize = 70;
const DEFAULT_SURVIVOR_FRACTION: f64 = 0.4;
const DEFAULT_OFFSPRING_FRACTION: f64 = 0.6;

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            population_size: DEFAULT_POPULATION_SIZE,
            maximal_phenotype_age: DEFAULT_MAXIMAL_PHENOTYPE_AGE,
            survivor_fraction: Probability::new_unchecked(DEFAULT_SURVIVOR_FRACTION),
            offspring_fraction: Probability::new_unchecked(DEFAULT_OFFSPRING_FRACTION),
            optimize: Optimize::Maximum,
            log_level: LogLevel::None,
        }
    }
}

/// Builder for `EngineOptions`.
///
/// Provides a fluent interface; unset values take their defaults.
#[derive(Debug, Clone, Default)]
pub struct EngineOptionsBuilder {
    population_size: Option<usize>,
    maximal_phenotype_age: Option<usize>,
    survivor_fraction: Option<f64>,
    offspring_fraction: Option<f64>,
    optimize: Option<Optimize>,
    log_level: Option<LogLevel>,
}

impl EngineOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn maximal_phenotype_age(mut self, value: usize) -> Self {
        self.maximal_phenotype_age = Some(value);
        self
    }

    pub fn survivor_fraction(mut self, value: f64) -> Self {
        self.survivor_fraction = Some(value);
        self
    }

    pub fn offspring_fraction(mut self, value: f64) -> Self {
        self.offspring_fraction = Some(value);
        self
    }

    pub fn optimize(mut self, value: Optimize) -> Self {
        self.optimize = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    /// Builds the `EngineOptions` instance.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the population size is zero or a
    /// fraction is not in `[0, 1]`.
    pub fn build(self) -> Result<EngineOptions> {
        let population_size = self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE);
        check_population_size(population_size)?;

        Ok(EngineOptions {
            population_size,
            maximal_phenotype_age: self
                .maximal_phenotype_age
                .unwrap_or(DEFAULT_MAXIMAL_PHENOTYPE_AGE),
            survivor_fraction: Probability::new(
                self.survivor_fraction.unwrap_or(DEFAULT_SURVIVOR_FRACTION),
            )?,
            offspring_fraction: Probability::new(
                self.offspring_fraction.unwrap_or(DEFAULT_OFFSPRING_FRACTION),
            )?,
            optimize: self.optimize.unwrap_or_default(),
            log_level: self.log_level.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.population_size(), 50);
        assert_eq!(options.maximal_phenotype_age(), 70);
        assert_eq!(options.survivors(), 20);
        assert_eq!(options.offspring(), 30);
        assert_eq!(options.optimize(), Optimize::Maximum);
        assert_eq!(options.log_level(), LogLevel::None);
        assert_eq!(EngineOptions::builder().build().unwrap(), options);
    }

    #[test]
    fn test_counts_are_rounded() {
        let options = EngineOptions::new(7, 10, 0.5, 0.5).unwrap();
        assert_eq!(options.survivors(), 4);
        assert_eq!(options.offspring(), 4);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(EngineOptions::new(0, 10, 0.5, 0.5).is_err());
        assert!(EngineOptions::new(10, 10, 1.5, 0.5).is_err());
        assert!(EngineOptions::new(10, 10, 0.5, -0.5).is_err());

        let mut options = EngineOptions::default();
        assert!(options.set_population_size(0).is_err());
        assert_eq!(options.population_size(), 50);
    }
}
