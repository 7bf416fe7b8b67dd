//! Run manifest written next to the datasets.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use ltx_core::{PipelineConfig, RunStats};

pub const MANIFEST_FILE: &str = "run_manifest.json";

/// A source extract read by the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    pub name: String,
    pub path: PathBuf,
    pub records: usize,
}

/// A dataset written by the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetEntry {
    pub file: String,
    pub rows: usize,
}

/// Describes one run: when, with what settings, from what, producing what.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub config: PipelineConfig,
    pub sources: Vec<SourceEntry>,
    pub datasets: Vec<DatasetEntry>,
    pub stats: RunStats,
}

impl RunManifest {
    pub fn new(config: PipelineConfig, stats: RunStats) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            sources: Vec::new(),
            datasets: Vec::new(),
            stats,
        }
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn with_source(mut self, name: impl Into<String>, path: &Path, records: usize) -> Self {
        self.sources.push(SourceEntry {
            name: name.into(),
            path: path.to_path_buf(),
            records,
        });
        self
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
