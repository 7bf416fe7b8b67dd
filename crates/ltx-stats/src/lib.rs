//! Survival statistics for right-censored graft survival data.
//!
//! Estimation and testing sit behind two small capability traits so the
//! pipeline can be exercised with substitutes:
//!
//! - [`SurvivalFitter`]: fit a survival curve to a sample
//!   ([`KaplanMeier`]).
//! - [`TwoSampleTest`]: compare two samples ([`LogRank`]).
//!
//! Every degenerate input (empty sample, no events, zero variance) is an
//! [`StatsError`]; callers decide whether that is fatal.

mod error;
mod kaplan_meier;
mod logrank;
mod sample;

pub use error::{Result, StatsError};
pub use kaplan_meier::{CurvePoint, KaplanMeier, SurvivalCurve};
pub use logrank::{LogRank, LogRankTest};
pub use sample::SurvivalSample;

/// Fits a survival curve to right-censored samples.
pub trait SurvivalFitter {
    fn fit_survival(&self, samples: &[SurvivalSample]) -> Result<SurvivalCurve>;
}

/// Compares the survival of two independent samples.
pub trait TwoSampleTest {
    fn logrank(
        &self,
        first: &[SurvivalSample],
        second: &[SurvivalSample],
    ) -> Result<LogRankTest>;
}

impl<F: SurvivalFitter + ?Sized> SurvivalFitter for &F {
    fn fit_survival(&self, samples: &[SurvivalSample]) -> Result<SurvivalCurve> {
        (**self).fit_survival(samples)
    }
}

impl<T: TwoSampleTest + ?Sized> TwoSampleTest for &T {
    fn logrank(
        &self,
        first: &[SurvivalSample],
        second: &[SurvivalSample],
    ) -> Result<LogRankTest> {
        (**self).logrank(first, second)
    }
}
