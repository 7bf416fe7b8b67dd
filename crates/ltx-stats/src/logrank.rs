//! Two-sample log-rank test.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::{Result, StatsError};
use crate::sample::{SurvivalSample, TimeStep, time_steps};
use crate::TwoSampleTest;

/// Outcome of a log-rank comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRankTest {
    /// Chi-square statistic with one degree of freedom.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Events observed in the first sample.
    pub observed: f64,
    /// Events expected in the first sample under the null hypothesis.
    pub expected: f64,
    pub variance: f64,
}

/// Mantel-Cox log-rank test with hypergeometric variance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogRank;

impl TwoSampleTest for LogRank {
    fn logrank(&self, first: &[SurvivalSample], second: &[SurvivalSample]) -> Result<LogRankTest> {
        if first.is_empty() || second.is_empty() {
            return Err(StatsError::EmptySample);
        }
        let first_steps = time_steps(first)?;
        let second_steps = time_steps(second)?;

        let mut at_risk = (first.len() as f64, second.len() as f64);
        let mut observed = 0.0;
        let mut expected = 0.0;
        let mut variance = 0.0;
        let mut any_event = false;

        let mut a = first_steps.iter().peekable();
        let mut b = second_steps.iter().peekable();
        loop {
            let time = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => x.time.min(y.time),
                (Some(x), None) => x.time,
                (None, Some(y)) => y.time,
                (None, None) => break,
            };
            let step_a = a.next_if(|step| step.time == time);
            let step_b = b.next_if(|step| step.time == time);

            let d1 = step_a.map_or(0, |step| step.events) as f64;
            let d2 = step_b.map_or(0, |step| step.events) as f64;
            let d = d1 + d2;
            if d > 0.0 {
                any_event = true;
                let n = at_risk.0 + at_risk.1;
                let share = at_risk.0 / n;
                observed += d1;
                expected += d * share;
                if n > 1.0 {
                    variance += d * share * (1.0 - share) * (n - d) / (n - 1.0);
                }
            }
            at_risk.0 -= step_a.map_or(0, TimeStep::leaving) as f64;
            at_risk.1 -= step_b.map_or(0, TimeStep::leaving) as f64;
        }

        if !any_event {
            return Err(StatsError::NoEvents);
        }
        if variance <= 0.0 {
            return Err(StatsError::ZeroVariance);
        }

        let statistic = (observed - expected).powi(2) / variance;
        let chi_squared =
            ChiSquared::new(1.0).map_err(|error| StatsError::Distribution(error.to_string()))?;
        Ok(LogRankTest {
            statistic,
            p_value: chi_squared.sf(statistic),
            observed,
            expected,
            variance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_events() {
        let first = [SurvivalSample::event(1.0), SurvivalSample::event(3.0)];
        let second = [SurvivalSample::event(2.0), SurvivalSample::event(4.0)];
        let test = LogRank.logrank(&first, &second).unwrap();

        assert_eq!(test.observed, 2.0);
        assert!((test.expected - 4.0 / 3.0).abs() < 1e-12);
        assert!((test.variance - 13.0 / 18.0).abs() < 1e-12);
        assert!((test.statistic - 8.0 / 13.0).abs() < 1e-12);
        assert!((test.p_value - 0.432_767_580_667_784_6).abs() < 1e-9);
    }

    #[test]
    fn identical_samples_are_not_different() {
        let sample = [
            SurvivalSample::event(5.0),
            SurvivalSample::censored(8.0),
            SurvivalSample::event(12.0),
        ];
        let test = LogRank.logrank(&sample, &sample).unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert!((test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn well_separated_samples_are_significant() {
        let early: Vec<_> = (1..=30).map(|t| SurvivalSample::event(f64::from(t))).collect();
        let late: Vec<_> = (100..=130)
            .map(|t| SurvivalSample::censored(f64::from(t)))
            .collect();
        let test = LogRank.logrank(&early, &late).unwrap();
        assert!(test.p_value < 1e-6);
    }

    #[test]
    fn no_events_is_degenerate() {
        let first = [SurvivalSample::censored(1.0)];
        let second = [SurvivalSample::censored(2.0)];
        assert_eq!(
            LogRank.logrank(&first, &second),
            Err(StatsError::NoEvents)
        );
    }

    #[test]
    fn single_subject_at_risk_has_zero_variance() {
        let first = [SurvivalSample::censored(1.0)];
        let second = [SurvivalSample::event(5.0)];
        assert_eq!(
            LogRank.logrank(&first, &second),
            Err(StatsError::ZeroVariance)
        );
    }

    #[test]
    fn empty_side_is_degenerate() {
        let sample = [SurvivalSample::event(1.0)];
        assert_eq!(LogRank.logrank(&sample, &[]), Err(StatsError::EmptySample));
        assert_eq!(LogRank.logrank(&[], &sample), Err(StatsError::EmptySample));
    }
}
