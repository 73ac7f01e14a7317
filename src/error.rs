//! # Error Types
//!
//! This module defines the error type shared by every component of the engine.
//! Construction errors are reported immediately by the constructors, state errors
//! by the [`Engine`](crate::evolution::Engine) and worker failures by the
//! [`Executor`](crate::concurrency::Executor) once every task of a batch has finished.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genforge::error::{GeneticError, Result};
//! use genforge::probability::Probability;
//!
//! fn checked(value: f64) -> Result<Probability> {
//!     Probability::new(value)
//! }
//!
//! assert!(checked(0.3).is_ok());
//! assert!(matches!(checked(1.3), Err(GeneticError::Configuration(_))));
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genforge::error::{GeneticError, OptionExt};
//!
//! fn find_best_candidate(candidates: &[i32]) -> genforge::error::Result<i32> {
//!     candidates.iter().max().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while configuring or running the engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// An invalid parameter was passed to a constructor or setter.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A selector could not satisfy the requested selection.
    #[error("Selection error: {0}")]
    Selection(String),

    /// The engine was driven out of order (`evolve` before `setup`, `setup` twice).
    #[error("State error: {0}")]
    State(String),

    /// The fitness function produced a value the engine cannot work with.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// A worker task failed. Reported after all tasks of the batch have drained.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use genforge::error::ResultExt;
///
/// fn parse(value: &str) -> genforge::error::Result<usize> {
///     value.parse::<usize>().context("Failed to parse thread count")
/// }
///
/// assert!(parse("4").is_ok());
/// assert!(parse("four").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it into a [`GeneticError::Other`].
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_message() {
        let parsed: std::result::Result<usize, _> = "x".parse::<usize>();
        let err = parsed.context("Failed to parse").unwrap_err();
        match err {
            GeneticError::Other(msg) => assert!(msg.starts_with("Failed to parse: ")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_option_ext() {
        let none: Option<u8> = None;
        assert!(matches!(
            none.ok_or_else_genetic(|| GeneticError::EmptyPopulation),
            Err(GeneticError::EmptyPopulation)
        ));
        assert_eq!(Some(3).ok_or_else_genetic(|| GeneticError::EmptyPopulation).unwrap(), 3);
    }

    #[test]
    fn test_display() {
        let err = GeneticError::State("setup() called twice".to_string());
        assert_eq!(err.to_string(), "State error: setup() called twice");
    }
}
