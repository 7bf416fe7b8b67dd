//! Output rows to polars frames.
//!
//! Column names are part of the dashboard contract and must not change.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use ltx_model::{
    CasUtilization, FlowAggregate, QualitySummary, SignificanceResult, SurvivalPoint,
    UtilizationAggregate,
};

use crate::error::Result;

/// `viz_map_data.csv`
pub mod map_columns {
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const OPO: &str = "OPO";
    pub const OPO_ZIP: &str = "OPO_Zip";
    pub const OPO_LAT: &str = "OPO_Lat";
    pub const OPO_LON: &str = "OPO_Lon";
    pub const CENTER: &str = "Center";
    pub const CENTER_ZIP: &str = "Center_Zip";
    pub const CENTER_LAT: &str = "Center_Lat";
    pub const CENTER_LON: &str = "Center_Lon";
    pub const COUNT: &str = "Count";
    pub const DCU_RATE: &str = "DCU_Rate";
}

/// `viz_survival_curves.csv`
pub mod curve_columns {
    pub const GROUP: &str = "Group";
    pub const GRAFT_TIME: &str = "GraftTime";
    pub const SURVIVAL_PROB: &str = "survival_prob";
    pub const CI_LOWER: &str = "ci_lower";
    pub const CI_UPPER: &str = "ci_upper";
}

/// `viz_survival_stats.csv`
pub mod stats_columns {
    pub const OPO: &str = "OPO";
    pub const P_VALUE: &str = "P_Value";
}

/// `viz_donor_utilization.csv`
pub mod utilization_columns {
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const OPO: &str = "DON_OPO";
    pub const CAS_PERIOD: &str = "CAS_Period";
    pub const DCD: &str = "DCD";
    pub const TOTAL_DONORS: &str = "Total_Donors";
    pub const USED_DONORS: &str = "Used_Donors";
    pub const UTILIZATION_RATE: &str = "Utilization_Rate";
    pub const DCU_RATE: &str = "DCU_Rate";
    pub const MEAN_LUNDON: &str = "Mean_LUNDON";
    pub const MEDIAN_LUNDON: &str = "Median_LUNDON";
    pub const N_LUNDON: &str = "N_LUNDON";
}

/// `viz_lundon_summary.csv`
pub mod lundon_columns {
    pub const OPO: &str = "DON_OPO";
    pub const CAS_PERIOD: &str = "CAS_Period";
    pub const MEAN_LUNDON: &str = "Mean_LUNDON";
    pub const MEDIAN_LUNDON: &str = "Median_LUNDON";
    pub const N: &str = "N";
}

/// `viz_donor_cas_summary.csv`
pub mod cas_columns {
    pub const OPO: &str = "DON_OPO";
    pub const CAS_PERIOD: &str = "CAS_Period";
    pub const TOTAL: &str = "Total";
    pub const USED: &str = "Used";
    pub const UTILIZATION: &str = "Utilization";
}

pub fn flow_frame(rows: &[FlowAggregate]) -> Result<DataFrame> {
    use map_columns as c;
    let year: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let month: Vec<u32> = rows.iter().map(|r| r.month).collect();
    let opo: Vec<&str> = rows.iter().map(|r| r.opo.as_str()).collect();
    let opo_zip: Vec<&str> = rows.iter().map(|r| r.opo_zip.as_str()).collect();
    let opo_lat: Vec<f64> = rows.iter().map(|r| r.opo_point.lat).collect();
    let opo_lon: Vec<f64> = rows.iter().map(|r| r.opo_point.lon).collect();
    let center: Vec<&str> = rows.iter().map(|r| r.center.as_str()).collect();
    let center_zip: Vec<&str> = rows.iter().map(|r| r.center_zip.as_str()).collect();
    let center_lat: Vec<f64> = rows.iter().map(|r| r.center_point.lat).collect();
    let center_lon: Vec<f64> = rows.iter().map(|r| r.center_point.lon).collect();
    let count: Vec<u32> = rows.iter().map(|r| r.count).collect();
    let dcu_rate: Vec<f64> = rows.iter().map(|r| r.dcu_rate).collect();

    let df = DataFrame::new(vec![
        Series::new(c::YEAR.into(), year).into_column(),
        Series::new(c::MONTH.into(), month).into_column(),
        Series::new(c::OPO.into(), opo).into_column(),
        Series::new(c::OPO_ZIP.into(), opo_zip).into_column(),
        Series::new(c::OPO_LAT.into(), opo_lat).into_column(),
        Series::new(c::OPO_LON.into(), opo_lon).into_column(),
        Series::new(c::CENTER.into(), center).into_column(),
        Series::new(c::CENTER_ZIP.into(), center_zip).into_column(),
        Series::new(c::CENTER_LAT.into(), center_lat).into_column(),
        Series::new(c::CENTER_LON.into(), center_lon).into_column(),
        Series::new(c::COUNT.into(), count).into_column(),
        Series::new(c::DCU_RATE.into(), dcu_rate).into_column(),
    ])?;
    Ok(df)
}

pub fn survival_curve_frame(rows: &[SurvivalPoint]) -> Result<DataFrame> {
    use curve_columns as c;
    let group: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
    let graft_time: Vec<f64> = rows.iter().map(|r| r.graft_time).collect();
    let survival: Vec<f64> = rows.iter().map(|r| r.survival_prob).collect();
    let lower: Vec<f64> = rows.iter().map(|r| r.ci_lower).collect();
    let upper: Vec<f64> = rows.iter().map(|r| r.ci_upper).collect();

    let df = DataFrame::new(vec![
        Series::new(c::GROUP.into(), group).into_column(),
        Series::new(c::GRAFT_TIME.into(), graft_time).into_column(),
        Series::new(c::SURVIVAL_PROB.into(), survival).into_column(),
        Series::new(c::CI_LOWER.into(), lower).into_column(),
        Series::new(c::CI_UPPER.into(), upper).into_column(),
    ])?;
    Ok(df)
}

pub fn significance_frame(rows: &[SignificanceResult]) -> Result<DataFrame> {
    use stats_columns as c;
    let opo: Vec<&str> = rows.iter().map(|r| r.opo.as_str()).collect();
    let p_value: Vec<Option<f64>> = rows.iter().map(|r| r.p_value).collect();

    let df = DataFrame::new(vec![
        Series::new(c::OPO.into(), opo).into_column(),
        Series::new(c::P_VALUE.into(), p_value).into_column(),
    ])?;
    Ok(df)
}

pub fn utilization_frame(rows: &[UtilizationAggregate]) -> Result<DataFrame> {
    use utilization_columns as c;
    let year: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let month: Vec<u32> = rows.iter().map(|r| r.month).collect();
    let opo: Vec<&str> = rows.iter().map(|r| r.opo.as_str()).collect();
    let period: Vec<&str> = rows.iter().map(|r| r.cas_period.as_str()).collect();
    let dcd: Vec<i32> = rows
        .iter()
        .map(|r| i32::from(r.donation.dcd_flag()))
        .collect();
    let total: Vec<u32> = rows.iter().map(|r| r.total_donors).collect();
    let used: Vec<u32> = rows.iter().map(|r| r.used_donors).collect();
    let rate: Vec<f64> = rows.iter().map(|r| r.utilization_rate).collect();
    let dcu_rate: Vec<Option<f64>> = rows.iter().map(|r| r.dcu_rate).collect();
    let mean: Vec<Option<f64>> = rows.iter().map(|r| r.lundon.mean).collect();
    let median: Vec<Option<f64>> = rows.iter().map(|r| r.lundon.median).collect();
    let n: Vec<u32> = rows.iter().map(|r| r.lundon.count).collect();

    let df = DataFrame::new(vec![
        Series::new(c::YEAR.into(), year).into_column(),
        Series::new(c::MONTH.into(), month).into_column(),
        Series::new(c::OPO.into(), opo).into_column(),
        Series::new(c::CAS_PERIOD.into(), period).into_column(),
        Series::new(c::DCD.into(), dcd).into_column(),
        Series::new(c::TOTAL_DONORS.into(), total).into_column(),
        Series::new(c::USED_DONORS.into(), used).into_column(),
        Series::new(c::UTILIZATION_RATE.into(), rate).into_column(),
        Series::new(c::DCU_RATE.into(), dcu_rate).into_column(),
        Series::new(c::MEAN_LUNDON.into(), mean).into_column(),
        Series::new(c::MEDIAN_LUNDON.into(), median).into_column(),
        Series::new(c::N_LUNDON.into(), n).into_column(),
    ])?;
    Ok(df)
}

pub fn lundon_summary_frame(rows: &[QualitySummary]) -> Result<DataFrame> {
    use lundon_columns as c;
    let opo: Vec<&str> = rows.iter().map(|r| r.opo.as_str()).collect();
    let period: Vec<&str> = rows.iter().map(|r| r.cas_period.as_str()).collect();
    let mean: Vec<Option<f64>> = rows.iter().map(|r| r.lundon.mean).collect();
    let median: Vec<Option<f64>> = rows.iter().map(|r| r.lundon.median).collect();
    let n: Vec<u32> = rows.iter().map(|r| r.lundon.count).collect();

    let df = DataFrame::new(vec![
        Series::new(c::OPO.into(), opo).into_column(),
        Series::new(c::CAS_PERIOD.into(), period).into_column(),
        Series::new(c::MEAN_LUNDON.into(), mean).into_column(),
        Series::new(c::MEDIAN_LUNDON.into(), median).into_column(),
        Series::new(c::N.into(), n).into_column(),
    ])?;
    Ok(df)
}

pub fn cas_summary_frame(rows: &[CasUtilization]) -> Result<DataFrame> {
    use cas_columns as c;
    let opo: Vec<&str> = rows.iter().map(|r| r.opo.as_str()).collect();
    let period: Vec<&str> = rows.iter().map(|r| r.cas_period.as_str()).collect();
    let total: Vec<u32> = rows.iter().map(|r| r.total).collect();
    let used: Vec<u32> = rows.iter().map(|r| r.used).collect();
    let utilization: Vec<f64> = rows.iter().map(|r| r.utilization).collect();

    let df = DataFrame::new(vec![
        Series::new(c::OPO.into(), opo).into_column(),
        Series::new(c::CAS_PERIOD.into(), period).into_column(),
        Series::new(c::TOTAL.into(), total).into_column(),
        Series::new(c::USED.into(), used).into_column(),
        Series::new(c::UTILIZATION.into(), utilization).into_column(),
    ])?;
    Ok(df)
}
