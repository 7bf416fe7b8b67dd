//! Rendering and writing of the output datasets.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::info;

use ltx_core::PipelineOutputs;

use crate::error::{OutputError, Result};
use crate::frames::{
    cas_summary_frame, flow_frame, lundon_summary_frame, significance_frame,
    survival_curve_frame, utilization_frame,
};
use crate::manifest::{DatasetEntry, MANIFEST_FILE, RunManifest};
use crate::staging::Staging;

pub const MAP_DATA_FILE: &str = "viz_map_data.csv";
pub const SURVIVAL_CURVES_FILE: &str = "viz_survival_curves.csv";
pub const SURVIVAL_STATS_FILE: &str = "viz_survival_stats.csv";
pub const DONOR_UTILIZATION_FILE: &str = "viz_donor_utilization.csv";
pub const LUNDON_SUMMARY_FILE: &str = "viz_lundon_summary.csv";
pub const DONOR_CAS_SUMMARY_FILE: &str = "viz_donor_cas_summary.csv";

/// One rendered output table.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub file_name: &'static str,
    pub frame: DataFrame,
}

impl Dataset {
    pub fn rows(&self) -> usize {
        self.frame.height()
    }
}

/// Builds every dataset frame of a run, in a stable order.
pub fn build_datasets(outputs: &PipelineOutputs) -> Result<Vec<Dataset>> {
    Ok(vec![
        Dataset {
            file_name: MAP_DATA_FILE,
            frame: flow_frame(&outputs.flows)?,
        },
        Dataset {
            file_name: SURVIVAL_CURVES_FILE,
            frame: survival_curve_frame(&outputs.survival_curves)?,
        },
        Dataset {
            file_name: SURVIVAL_STATS_FILE,
            frame: significance_frame(&outputs.significance)?,
        },
        Dataset {
            file_name: DONOR_UTILIZATION_FILE,
            frame: utilization_frame(&outputs.utilization)?,
        },
        Dataset {
            file_name: LUNDON_SUMMARY_FILE,
            frame: lundon_summary_frame(&outputs.quality_summary)?,
        },
        Dataset {
            file_name: DONOR_CAS_SUMMARY_FILE,
            frame: cas_summary_frame(&outputs.cas_utilization)?,
        },
    ])
}

/// Renders a frame as CSV with a header row. Nulls become empty cells.
pub fn render_csv(frame: &mut DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(frame)?;
    Ok(buffer)
}

/// Files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReport {
    pub files: Vec<PathBuf>,
    pub manifest: RunManifest,
}

/// Writes every dataset and the run manifest into `output_dir`.
///
/// Nothing in `output_dir` is replaced until every file has been rendered
/// and staged, so a failure up to that point leaves the previous run's files
/// intact. A rename failing after that leaves the files moved so far from
/// this run and the rest from the previous one; the manifest is moved last.
pub fn write_outputs(
    output_dir: &Path,
    outputs: &PipelineOutputs,
    manifest: RunManifest,
) -> Result<WriteReport> {
    fs::create_dir_all(output_dir).map_err(|source| OutputError::Io {
        operation: "create directory",
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut manifest = manifest;
    let mut staging = Staging::new();
    for mut dataset in build_datasets(outputs)? {
        let bytes = render_csv(&mut dataset.frame)?;
        staging.stage(&output_dir.join(dataset.file_name), &bytes)?;
        manifest.datasets.push(DatasetEntry {
            file: dataset.file_name.to_string(),
            rows: dataset.rows(),
        });
    }
    staging.stage(&output_dir.join(MANIFEST_FILE), &manifest.to_json()?)?;

    let files = staging.commit()?;
    info!(
        output_dir = %output_dir.display(),
        files = files.len(),
        "wrote output datasets"
    );
    Ok(WriteReport { files, manifest })
}
