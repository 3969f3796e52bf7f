//! Typed errors for record loading and metric computation.
//!
//! Every failure aborts the run: a summary averaged over partial or corrupt
//! data would be worse than failing loudly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the pure AUC integration routine.
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("x and y must have the same length (x has {x}, y has {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("at least 2 points are required to integrate, got {0}")]
    TooFewPoints(usize),

    #[error("x is neither non-decreasing nor non-increasing")]
    NonMonotonic,
}

/// Errors from loading and evaluating result files.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad record shape in {path}: {reason}")]
    Shape { path: PathBuf, reason: String },

    #[error("metric computation failed for {path}")]
    Metric {
        path: PathBuf,
        #[source]
        source: MetricError,
    },

    #[error("no samples to aggregate")]
    Empty,
}
