//! Source records loaded from the registry extract.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Donation pathway of the organ donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DonationType {
    /// Donation after brain death.
    Dbd,
    /// Donation after circulatory death.
    Dcd,
}

impl DonationType {
    /// Maps the extract's `DCD` indicator (true = DCD).
    pub fn from_dcd_flag(is_dcd: bool) -> Self {
        if is_dcd { Self::Dcd } else { Self::Dbd }
    }

    /// The `DCD` column value written to outputs (0 = DBD, 1 = DCD).
    pub fn dcd_flag(self) -> u8 {
        match self {
            Self::Dbd => 0,
            Self::Dcd => 1,
        }
    }

    pub fn is_dbd(self) -> bool {
        self == Self::Dbd
    }
}

/// Allocation policy period relative to the CAS cutover date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CasPeriod {
    #[serde(rename = "Pre-CAS")]
    PreCas,
    #[serde(rename = "Post-CAS")]
    PostCas,
}

impl CasPeriod {
    /// Dates on or after the cutover are post-CAS.
    pub fn classify(date: NaiveDate, cutover: NaiveDate) -> Self {
        if date < cutover {
            Self::PreCas
        } else {
            Self::PostCas
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreCas => "Pre-CAS",
            Self::PostCas => "Post-CAS",
        }
    }
}

impl fmt::Display for CasPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transplant event.
///
/// Only the donor OPO is guaranteed; every other field is absent when the
/// extract cell was blank or unparseable, and each stage skips the records it
/// cannot use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransplantRecord {
    pub donor_opo: String,
    pub center: Option<String>,
    /// Raw donor OPO postal code as found in the extract.
    pub opo_zip: Option<String>,
    /// Raw transplant center postal code as found in the extract.
    pub center_zip: Option<String>,
    pub transplant_date: Option<NaiveDate>,
    pub donation: Option<DonationType>,
    /// Graft survival time in days.
    pub graft_time: Option<f64>,
    /// Graft failure observed (`true`) or censored (`false`).
    pub graft_failed: Option<bool>,
    pub any_dcu: Option<bool>,
}

impl TransplantRecord {
    pub fn new(donor_opo: impl Into<String>) -> Self {
        Self {
            donor_opo: donor_opo.into(),
            center: None,
            opo_zip: None,
            center_zip: None,
            transplant_date: None,
            donation: None,
            graft_time: None,
            graft_failed: None,
            any_dcu: None,
        }
    }

    pub fn is_dbd(&self) -> bool {
        self.donation.is_some_and(DonationType::is_dbd)
    }

    /// (year, month) of the transplant date.
    pub fn period(&self) -> Option<(i32, u32)> {
        self.transplant_date.map(|date| (date.year(), date.month()))
    }
}

/// One recovered organ donor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorRecord {
    pub opo: String,
    pub recovery_date: Option<NaiveDate>,
    pub donation: Option<DonationType>,
    /// Whether the recovered lung was transplanted.
    pub transplanted: Option<bool>,
    pub dcu: Option<bool>,
    lundon: Option<f64>,
}

impl DonorRecord {
    /// Builds a donor record. The LUNDON score is kept only for DBD donors.
    pub fn new(
        opo: impl Into<String>,
        recovery_date: Option<NaiveDate>,
        donation: Option<DonationType>,
        transplanted: Option<bool>,
        dcu: Option<bool>,
        lundon: Option<f64>,
    ) -> Self {
        let lundon = match donation {
            Some(DonationType::Dbd) => lundon.filter(|score| score.is_finite()),
            _ => None,
        };
        Self {
            opo: opo.into(),
            recovery_date,
            donation,
            transplanted,
            dcu,
            lundon,
        }
    }

    /// Donor quality score; always `None` for DCD or unknown donation type.
    pub fn quality_score(&self) -> Option<f64> {
        self.lundon
    }

    /// (year, month) of the recovery date.
    pub fn period(&self) -> Option<(i32, u32)> {
        self.recovery_date.map(|date| (date.year(), date.month()))
    }
}
