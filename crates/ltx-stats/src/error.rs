//! Error types for survival statistics.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    /// No samples were supplied (for a two-sample test, on either side).
    #[error("survival sample is empty")]
    EmptySample,

    /// A sample time was negative or not finite.
    #[error("invalid survival time: {0}")]
    InvalidTime(f64),

    /// Confidence level outside (0, 1).
    #[error("confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    /// The pooled samples contain no observed event.
    #[error("no events observed in either sample")]
    NoEvents,

    /// The test statistic has zero variance.
    #[error("log-rank variance is zero")]
    ZeroVariance,

    /// A reference distribution could not be constructed.
    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;
