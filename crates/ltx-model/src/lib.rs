//! Data model for the lung transplant precompute pipeline.
//!
//! Source records ([`TransplantRecord`], [`DonorRecord`]) are loaded once per
//! run and never mutated. Every derived dataset is a flat list of output rows
//! defined in [`outputs`].

pub mod error;
pub mod geo;
pub mod lookup;
pub mod outputs;
pub mod records;

pub use error::{LtxError, Result};
pub use geo::{GeoPoint, PostalCode};
pub use lookup::CaseInsensitiveSet;
pub use outputs::{
    CasUtilization, FlowAggregate, QualitySummary, ScoreStats, SignificanceResult,
    SurvivalPoint, UtilizationAggregate,
};
pub use records::{CasPeriod, DonationType, DonorRecord, TransplantRecord};

/// Group label used for the whole-population survival curve.
pub const NATIONWIDE_GROUP: &str = "Nationwide";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_result_serializes() {
        let result = SignificanceResult {
            opo: "CAOP".to_string(),
            p_value: Some(0.0123),
        };
        let json = serde_json::to_string(&result).expect("serialize result");
        let round: SignificanceResult = serde_json::from_str(&json).expect("deserialize result");
        assert_eq!(round, result);
    }

    #[test]
    fn undefined_p_value_round_trips_as_null() {
        let result = SignificanceResult {
            opo: "OHLB".to_string(),
            p_value: None,
        };
        let json = serde_json::to_string(&result).expect("serialize result");
        assert!(json.contains("null"));
    }
}
