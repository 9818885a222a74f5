use thiserror::Error;

use common::error::Error as ArbSolverError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("Graph processing error: {0}")]
    GraphError(#[from] ArbSolverError),

    #[error("No rate available for {from} -> {to} or its reciprocal.")]
    MissingRate { from: String, to: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Detection task failed: {0}")]
    TaskFailed(String),
}
