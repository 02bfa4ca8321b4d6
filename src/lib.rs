// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod analysis;
pub mod csv;
pub mod episodes;
pub mod error;
pub mod file;
pub mod progress;
pub mod recaps;
pub mod reconcile;
pub mod runner;
pub mod store;

pub use error::{ParseFailure, PipelineError};
