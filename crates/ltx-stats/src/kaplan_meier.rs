//! Kaplan-Meier product-limit estimator.
//!
//! Confidence bounds use Greenwood's variance on the log(-log) scale, which
//! keeps both bounds inside [0, 1]:
//!
//! ```text
//! V(t)  = sum over event times t_i <= t of d_i / (n_i (n_i - d_i))
//! se(t) = sqrt(V(t)) / |ln S(t)|
//! lower = S(t) ^ exp( z se(t))
//! upper = S(t) ^ exp(-z se(t))
//! ```

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, StatsError};
use crate::sample::{SurvivalSample, time_steps};
use crate::SurvivalFitter;

/// One step of a fitted curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub time: f64,
    pub survival: f64,
    pub lower: f64,
    pub upper: f64,
    /// Subjects at risk just before `time`.
    pub at_risk: usize,
    pub events: usize,
    pub censored: usize,
}

/// A fitted survival curve, ascending in time and starting at `t = 0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurvivalCurve {
    pub points: Vec<CurvePoint>,
}

impl SurvivalCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Kaplan-Meier fitter with two-sided log(-log) confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KaplanMeier {
    confidence: f64,
}

impl Default for KaplanMeier {
    fn default() -> Self {
        Self { confidence: 0.95 }
    }
}

impl KaplanMeier {
    pub fn new(confidence: f64) -> Result<Self> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(StatsError::InvalidConfidence(confidence));
        }
        Ok(Self { confidence })
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    fn critical_value(&self) -> Result<f64> {
        let normal =
            Normal::new(0.0, 1.0).map_err(|error| StatsError::Distribution(error.to_string()))?;
        Ok(normal.inverse_cdf(1.0 - (1.0 - self.confidence) / 2.0))
    }
}

impl SurvivalFitter for KaplanMeier {
    fn fit_survival(&self, samples: &[SurvivalSample]) -> Result<SurvivalCurve> {
        let steps = time_steps(samples)?;
        let z = self.critical_value()?;

        let mut points = Vec::with_capacity(steps.len() + 1);
        let mut at_risk = samples.len();
        let mut survival = 1.0_f64;
        let mut greenwood = 0.0_f64;

        if steps.first().is_some_and(|step| step.time > 0.0) {
            points.push(CurvePoint {
                time: 0.0,
                survival: 1.0,
                lower: 1.0,
                upper: 1.0,
                at_risk,
                events: 0,
                censored: 0,
            });
        }

        for step in steps {
            if step.events > 0 {
                let n = at_risk as f64;
                let d = step.events as f64;
                survival *= 1.0 - d / n;
                if at_risk > step.events {
                    greenwood += d / (n * (n - d));
                }
            }
            let (lower, upper) = log_log_bounds(survival, greenwood, z);
            points.push(CurvePoint {
                time: step.time,
                survival,
                lower,
                upper,
                at_risk,
                events: step.events,
                censored: step.censored,
            });
            at_risk -= step.leaving();
        }

        Ok(SurvivalCurve { points })
    }
}

fn log_log_bounds(survival: f64, variance: f64, z: f64) -> (f64, f64) {
    if survival >= 1.0 {
        return (1.0, 1.0);
    }
    if survival <= 0.0 {
        return (0.0, 0.0);
    }
    let se = variance.sqrt() / survival.ln().abs();
    let lower = survival.powf((z * se).exp());
    let upper = survival.powf((-z * se).exp());
    (lower.clamp(0.0, survival), upper.clamp(survival, 1.0))
}
