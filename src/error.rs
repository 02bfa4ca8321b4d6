// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline errors. Anything here aborts the run before output is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid recap document: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {reason}")]
    Table { path: PathBuf, reason: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown show: {0}")]
    UnknownShow(String),
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io { path: path.into(), source }
    }

    pub fn table(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PipelineError::Table { path: path.into(), reason: reason.into() }
    }
}

/// Why a single scraped field could not be coerced.
/// Callers decide whether that means "absent" or "drop the row".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("empty value")]
    Empty,

    #[error("no {expected} found in {raw:?}")]
    NoMatch { expected: &'static str, raw: String },
}

pub type ParseResult<T> = Result<T, ParseFailure>;
