//! # Evolution
//!
//! The generational control loop: [`Engine`] with its [`EngineBuilder`] and the
//! scalar [`EngineOptions`].

pub mod builder;
pub mod engine;
pub mod options;

pub use builder::EngineBuilder;
pub use engine::{Engine, EngineState};
pub use options::{EngineOptions, EngineOptionsBuilder, LogLevel};
