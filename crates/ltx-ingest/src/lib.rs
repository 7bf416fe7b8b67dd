//! Registry extract ingestion.
//!
//! Reads the transplant-level and donor-level extracts (CSV) into Polars
//! DataFrames and converts them into typed [`ltx_model`] records.
//!
//! A missing file or a missing required column aborts the load. Anything
//! finer grained is parse-or-skip: blank or malformed cells become absent
//! values, and rows without an OPO identifier are dropped and counted.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ltx_ingest::{load_donors, load_transplants};
//!
//! let data_dir = Path::new("data");
//! let transplants = load_transplants(&data_dir.join("LU_REC_MAP.csv"))?;
//! let donors = load_donors(&data_dir.join("LU_DON_MAP.csv"))?;
//! ```

mod csv;
mod error;
mod records;
pub mod values;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::read_extract;

// === Record Conversion ===
pub use records::{
    Loaded, donor_columns, donors_from_frame, load_donors, load_transplants,
    transplant_columns, transplants_from_frame,
};
