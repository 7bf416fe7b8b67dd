//! Error types for registry extract ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading of a registry extract.
///
/// Row-level problems never surface here; unparseable cells become absent
/// values and are dealt with by the pipeline stages.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Extract file not found.
    #[error("extract file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the extract file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required column not present in the extract.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
