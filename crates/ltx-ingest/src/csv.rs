//! CSV extract reading.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader, StringChunked};

use ltx_model::CaseInsensitiveSet;

use crate::error::{IngestError, Result};

/// Reads an extract into a DataFrame with every column as text.
///
/// Typing happens afterwards, per cell, so that a single malformed value
/// cannot fail schema inference for the whole column.
pub fn read_extract(path: &Path) -> Result<DataFrame> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if !metadata.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read extract"
    );
    Ok(df)
}

/// Text columns of an extract, looked up case-insensitively.
pub(crate) struct ExtractColumns<'a> {
    df: &'a DataFrame,
    names: CaseInsensitiveSet,
    path: &'a Path,
}

impl<'a> ExtractColumns<'a> {
    pub(crate) fn new(df: &'a DataFrame, path: &'a Path) -> Self {
        let names = CaseInsensitiveSet::new(df.get_column_names().iter().map(|n| n.as_str()));
        Self { df, names, path }
    }

    /// A column the extract must carry.
    pub(crate) fn required(&self, name: &str) -> Result<&'a StringChunked> {
        self.optional(name)?
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: self.path.to_path_buf(),
            })
    }

    /// A column that may be absent from older extracts.
    pub(crate) fn optional(&self, name: &str) -> Result<Option<&'a StringChunked>> {
        let Some(actual) = self.names.get(name) else {
            return Ok(None);
        };
        let column = self.df.column(actual)?;
        Ok(Some(column.str()?))
    }
}
