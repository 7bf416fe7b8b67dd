//! Output rows of the derived datasets.
//!
//! Each struct maps one-to-one onto a row of an output CSV; the column names
//! live with the writers in `ltx-output`. Undefined statistics are `None` and
//! render as empty cells.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, PostalCode};
use crate::records::{CasPeriod, DonationType};

/// Transplant flow between a donor OPO and a transplant center in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAggregate {
    pub year: i32,
    pub month: u32,
    pub opo: String,
    pub opo_zip: PostalCode,
    pub opo_point: GeoPoint,
    pub center: String,
    pub center_zip: PostalCode,
    pub center_point: GeoPoint,
    pub count: u32,
    pub dcu_rate: f64,
}

/// One step of a Kaplan-Meier curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPoint {
    pub group: String,
    pub graft_time: f64,
    pub survival_prob: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Log-rank comparison of one OPO against the rest of the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub opo: String,
    pub p_value: Option<f64>,
}

/// Donor-quality score summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub count: u32,
}

/// Monthly donor utilization for one OPO, CAS period and donation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationAggregate {
    pub year: i32,
    pub month: u32,
    pub opo: String,
    pub cas_period: CasPeriod,
    pub donation: DonationType,
    pub total_donors: u32,
    pub used_donors: u32,
    pub utilization_rate: f64,
    pub dcu_rate: Option<f64>,
    pub lundon: ScoreStats,
}

/// Utilization rolled up to OPO and CAS period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasUtilization {
    pub opo: String,
    pub cas_period: CasPeriod,
    pub total: u32,
    pub used: u32,
    pub utilization: f64,
}

/// DBD donor-quality scores rolled up to OPO and CAS period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub opo: String,
    pub cas_period: CasPeriod,
    pub lundon: ScoreStats,
}
