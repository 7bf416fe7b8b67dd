//! Output writing for the precompute pipeline.
//!
//! Each dataset becomes a flat CSV file in the output directory, next to a
//! `run_manifest.json` describing the run. Files are staged and only moved
//! into place once every one of them rendered, so a run that fails while
//! rendering or staging leaves the previous outputs untouched. The renames
//! themselves are not one atomic step; see [`write_outputs`].

mod error;
pub mod frames;
mod manifest;
mod staging;
mod writer;

pub use error::{OutputError, Result};
pub use manifest::{DatasetEntry, MANIFEST_FILE, RunManifest, SourceEntry};
pub use writer::{
    DONOR_CAS_SUMMARY_FILE, DONOR_UTILIZATION_FILE, Dataset, LUNDON_SUMMARY_FILE,
    MAP_DATA_FILE, SURVIVAL_CURVES_FILE, SURVIVAL_STATS_FILE, WriteReport, build_datasets,
    render_csv, write_outputs,
};
