//! One `run` invocation: load, compute, write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use ltx_core::{PipelineConfig, PipelineInputs, RunStats};
use ltx_geo::{Gazetteer, GeocodeStats, Geocoder};
use ltx_ingest::{load_donors, load_transplants};
use ltx_output::{RunManifest, build_datasets, write_outputs};
use ltx_stats::{KaplanMeier, LogRank};

pub const TRANSPLANTS_FILE: &str = "LU_REC_MAP.csv";
pub const DONORS_FILE: &str = "LU_DON_MAP.csv";
pub const GAZETTEER_FILE: &str = "US.txt";
pub const OUTPUT_DIR: &str = "output";

/// Resolved inputs and settings of a run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub transplants: PathBuf,
    pub donors: PathBuf,
    pub gazetteer: PathBuf,
    pub output_dir: PathBuf,
    pub config: PipelineConfig,
    pub dry_run: bool,
}

impl RunRequest {
    /// Default file layout under a data directory.
    pub fn from_data_dir(data_dir: &Path) -> Self {
        Self {
            transplants: data_dir.join(TRANSPLANTS_FILE),
            donors: data_dir.join(DONORS_FILE),
            gazetteer: data_dir.join(GAZETTEER_FILE),
            output_dir: data_dir.join(OUTPUT_DIR),
            config: PipelineConfig::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub file: String,
    pub rows: usize,
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub datasets: Vec<DatasetSummary>,
    /// Empty for a dry run.
    pub written: Vec<PathBuf>,
    pub stats: RunStats,
    pub geocoding: GeocodeStats,
    pub gazetteer_loaded: bool,
    pub dry_run: bool,
}

/// Loads the extracts, runs every stage and writes the datasets.
///
/// A missing extract, a missing required column or a failed write aborts the
/// run before any output file is replaced. A missing gazetteer only degrades
/// the map dataset.
pub fn execute(request: &RunRequest) -> Result<RunResult> {
    let run_span = info_span!("run", output_dir = %request.output_dir.display());
    let _run_guard = run_span.enter();

    let (transplants, donors) = info_span!("ingest").in_scope(|| -> Result<_> {
        let transplants = load_transplants(&request.transplants)
            .with_context(|| format!("load transplants from {}", request.transplants.display()))?;
        let donors = load_donors(&request.donors)
            .with_context(|| format!("load donors from {}", request.donors.display()))?;
        Ok((transplants, donors))
    })?;

    let (gazetteer, gazetteer_loaded) = match Gazetteer::from_path(&request.gazetteer) {
        Ok(gazetteer) => (gazetteer, true),
        Err(error) => {
            warn!(%error, "gazetteer unavailable; every postal code will be unresolved");
            (Gazetteer::empty(), false)
        }
    };
    let mut geocoder = Geocoder::new(gazetteer);
    let fitter = KaplanMeier::new(request.config.confidence).context("confidence level")?;

    let outputs = ltx_core::run(
        PipelineInputs {
            transplants: &transplants.records,
            donors: &donors.records,
        },
        &request.config,
        &mut geocoder,
        &fitter,
        &LogRank,
    )
    .context("pipeline configuration")?;
    let geocoding = geocoder.stats();
    info!(
        lookups = geocoding.lookups,
        cache_hits = geocoding.cache_hits,
        unresolved = geocoding.unresolved,
        "geocoding complete"
    );

    let (datasets, written) = if request.dry_run {
        let datasets = build_datasets(&outputs)
            .context("render datasets")?
            .iter()
            .map(|dataset| DatasetSummary {
                file: dataset.file_name.to_string(),
                rows: dataset.rows(),
            })
            .collect();
        (datasets, Vec::new())
    } else {
        let manifest = RunManifest::new(request.config.clone(), outputs.stats.clone())
            .with_source("transplants", &request.transplants, transplants.len())
            .with_source("donors", &request.donors, donors.len());
        let report = info_span!("write")
            .in_scope(|| write_outputs(&request.output_dir, &outputs, manifest))
            .with_context(|| format!("write outputs to {}", request.output_dir.display()))?;
        let datasets = report
            .manifest
            .datasets
            .iter()
            .map(|entry| DatasetSummary {
                file: entry.file.clone(),
                rows: entry.rows,
            })
            .collect();
        (datasets, report.files)
    };

    Ok(RunResult {
        output_dir: request.output_dir.clone(),
        datasets,
        written,
        stats: outputs.stats,
        geocoding,
        gazetteer_loaded,
        dry_run: request.dry_run,
    })
}
