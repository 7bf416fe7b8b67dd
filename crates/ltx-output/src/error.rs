//! Error types for output writing.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// Filesystem operation failed.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A staged file could not be moved into place.
    #[error("failed to move {temp_path} to {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Building or rendering a frame failed.
    #[error("dataframe error: {message}")]
    DataFrame { message: String },

    /// The run manifest could not be serialized.
    #[error("failed to serialize run manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl From<PolarsError> for OutputError {
    fn from(err: PolarsError) -> Self {
        OutputError::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
