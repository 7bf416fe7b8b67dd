//! Error types for geocoding.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    /// Failed to open or read the gazetteer file.
    #[error("failed to read gazetteer {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed gazetteer content.
    #[error("failed to parse gazetteer: {0}")]
    Csv(#[from] csv::Error),

    /// The lookup service could not answer.
    #[error("lookup failed for {code}: {reason}")]
    Lookup { code: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GeoError>;
