//! Conversion of extract frames into typed records.

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use ltx_model::{DonationType, DonorRecord, TransplantRecord};

use crate::csv::{ExtractColumns, read_extract};
use crate::error::Result;
use crate::values::{parse_date, parse_flag, parse_number, parse_text};

/// Column names of the transplant-level extract.
pub mod transplant_columns {
    pub const DONOR_OPO: &str = "DON_OPO";
    pub const CENTER: &str = "REC_CTR_CD";
    pub const OPO_ZIP: &str = "OPO_ZIP";
    pub const CENTER_ZIP: &str = "TXP_CTR_ZIP";
    pub const TRANSPLANT_DATE: &str = "REC_TX_DT";
    pub const DCD: &str = "DCD";
    pub const GRAFT_TIME: &str = "GraftTime";
    pub const GRAFT_DEATH: &str = "GraftDeath";
    pub const ANY_DCU: &str = "any_DCU";
}

/// Column names of the donor-level extract.
pub mod donor_columns {
    pub const OPO: &str = "DON_OPO";
    pub const RECOVERY_DATE: &str = "DON_RECOV_DT";
    pub const DCD: &str = "DCD";
    pub const TRANSPLANTED: &str = "Transplanted";
    pub const LUNDON: &str = "LUNDON";
    pub const DCU: &str = "DCU_any";
}

/// Records converted from one extract.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    /// Rows dropped because they carried no OPO identifier.
    pub skipped: usize,
}

impl<T> Loaded<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads and converts the transplant-level extract.
pub fn load_transplants(path: &Path) -> Result<Loaded<TransplantRecord>> {
    let df = read_extract(path)?;
    let loaded = transplants_from_frame(&df, path)?;
    info!(
        path = %path.display(),
        records = loaded.len(),
        skipped = loaded.skipped,
        "loaded transplant records"
    );
    Ok(loaded)
}

/// Reads and converts the donor-level extract.
pub fn load_donors(path: &Path) -> Result<Loaded<DonorRecord>> {
    let df = read_extract(path)?;
    let loaded = donors_from_frame(&df, path)?;
    info!(
        path = %path.display(),
        records = loaded.len(),
        skipped = loaded.skipped,
        "loaded donor records"
    );
    Ok(loaded)
}

/// Converts a text frame into transplant records.
///
/// `source` only labels errors.
pub fn transplants_from_frame(df: &DataFrame, source: &Path) -> Result<Loaded<TransplantRecord>> {
    use transplant_columns as c;

    let columns = ExtractColumns::new(df, source);
    let opo = columns.required(c::DONOR_OPO)?;
    let center = columns.required(c::CENTER)?;
    let opo_zip = columns.required(c::OPO_ZIP)?;
    let center_zip = columns.required(c::CENTER_ZIP)?;
    let date = columns.required(c::TRANSPLANT_DATE)?;
    let dcd = columns.required(c::DCD)?;
    let graft_time = columns.required(c::GRAFT_TIME)?;
    let graft_death = columns.required(c::GRAFT_DEATH)?;
    let any_dcu = columns.optional(c::ANY_DCU)?;
    if any_dcu.is_none() {
        debug!(path = %source.display(), "no {} column; DCU rates default to 0", c::ANY_DCU);
    }

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let Some(donor_opo) = parse_text(opo.get(idx)) else {
            skipped += 1;
            continue;
        };
        records.push(TransplantRecord {
            donor_opo,
            center: parse_text(center.get(idx)),
            opo_zip: parse_text(opo_zip.get(idx)),
            center_zip: parse_text(center_zip.get(idx)),
            transplant_date: parse_date(date.get(idx)),
            donation: parse_flag(dcd.get(idx)).map(DonationType::from_dcd_flag),
            graft_time: parse_number(graft_time.get(idx)),
            graft_failed: parse_flag(graft_death.get(idx)),
            any_dcu: any_dcu.and_then(|ca| parse_flag(ca.get(idx))),
        });
    }
    if skipped > 0 {
        debug!(path = %source.display(), skipped, "transplant rows without an OPO identifier");
    }
    Ok(Loaded { records, skipped })
}

/// Converts a text frame into donor records.
pub fn donors_from_frame(df: &DataFrame, source: &Path) -> Result<Loaded<DonorRecord>> {
    use donor_columns as c;

    let columns = ExtractColumns::new(df, source);
    let opo_column = columns.required(c::OPO)?;
    let date = columns.required(c::RECOVERY_DATE)?;
    let dcd = columns.required(c::DCD)?;
    let transplanted = columns.required(c::TRANSPLANTED)?;
    let lundon = columns.optional(c::LUNDON)?;
    let dcu = columns.optional(c::DCU)?;

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for idx in 0..df.height() {
        let Some(opo) = parse_text(opo_column.get(idx)) else {
            skipped += 1;
            continue;
        };
        records.push(DonorRecord::new(
            opo,
            parse_date(date.get(idx)),
            parse_flag(dcd.get(idx)).map(DonationType::from_dcd_flag),
            parse_flag(transplanted.get(idx)),
            dcu.and_then(|ca| parse_flag(ca.get(idx))),
            lundon.and_then(|ca| parse_number(ca.get(idx))),
        ));
    }
    if skipped > 0 {
        debug!(path = %source.display(), skipped, "donor rows without an OPO identifier");
    }
    Ok(Loaded { records, skipped })
}
