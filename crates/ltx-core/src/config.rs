//! Pipeline configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

/// First transplant date of the survival window.
pub const DEFAULT_WINDOW_START: NaiveDate = date(2018, 1, 1);
/// Last transplant date of the survival window (inclusive).
pub const DEFAULT_WINDOW_END: NaiveDate = date(2024, 12, 31);
/// Five years of follow-up.
pub const DEFAULT_HORIZON_DAYS: f64 = 1825.0;
/// An OPO needs strictly more qualifying records than this for its own curve.
pub const DEFAULT_MIN_STRATUM_RECORDS: usize = 10;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;
/// Lung Composite Allocation Score went live on this date.
pub const DEFAULT_CAS_CUTOVER: NaiveDate = date(2023, 3, 9);

/// Analysis parameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub horizon_days: f64,
    pub min_stratum_records: usize,
    pub confidence: f64,
    pub cas_cutover: NaiveDate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_start: DEFAULT_WINDOW_START,
            window_end: DEFAULT_WINDOW_END,
            horizon_days: DEFAULT_HORIZON_DAYS,
            min_stratum_records: DEFAULT_MIN_STRATUM_RECORDS,
            confidence: DEFAULT_CONFIDENCE,
            cas_cutover: DEFAULT_CAS_CUTOVER,
        }
    }
}

impl PipelineConfig {
    pub fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    pub fn with_horizon_days(mut self, horizon_days: f64) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_min_stratum_records(mut self, min_stratum_records: usize) -> Self {
        self.min_stratum_records = min_stratum_records;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_cas_cutover(mut self, cas_cutover: NaiveDate) -> Self {
        self.cas_cutover = cas_cutover;
        self
    }

    /// Whether a transplant date falls inside the survival window.
    pub fn in_window(&self, date: NaiveDate) -> bool {
        (self.window_start..=self.window_end).contains(&date)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_end < self.window_start {
            return Err(CoreError::InvalidConfig {
                field: "window",
                reason: format!(
                    "end {} is before start {}",
                    self.window_end, self.window_start
                ),
            });
        }
        if !(self.horizon_days.is_finite() && self.horizon_days > 0.0) {
            return Err(CoreError::InvalidConfig {
                field: "horizon_days",
                reason: format!("{} is not a positive number of days", self.horizon_days),
            });
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(CoreError::InvalidConfig {
                field: "confidence",
                reason: format!("{} is not strictly between 0 and 1", self.confidence),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_registry_analysis() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_start, date(2018, 1, 1));
        assert_eq!(config.window_end, date(2024, 12, 31));
        assert_eq!(config.horizon_days, 1825.0);
        assert_eq!(config.min_stratum_records, 10);
        assert_eq!(config.cas_cutover, date(2023, 3, 9));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn window_is_inclusive() {
        let config = PipelineConfig::default();
        assert!(config.in_window(date(2018, 1, 1)));
        assert!(config.in_window(date(2024, 12, 31)));
        assert!(!config.in_window(date(2017, 12, 31)));
        assert!(!config.in_window(date(2025, 1, 1)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let config = PipelineConfig::default().with_window(date(2024, 1, 1), date(2020, 1, 1));
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig { field: "window", .. })
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(PipelineConfig::default().with_horizon_days(0.0).validate().is_err());
        assert!(PipelineConfig::default().with_horizon_days(f64::NAN).validate().is_err());
        assert!(PipelineConfig::default().with_confidence(1.0).validate().is_err());
    }

    #[test]
    fn serializes_for_the_manifest() {
        let json = serde_json::to_value(PipelineConfig::default()).unwrap();
        assert_eq!(json["window_start"], "2018-01-01");
        assert_eq!(json["cas_cutover"], "2023-03-09");
        assert_eq!(json["min_stratum_records"], 10);
    }
}
