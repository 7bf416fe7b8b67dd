//! Right-censored survival observations.

use crate::error::{Result, StatsError};

/// One subject: time to event or censoring, and whether the event was seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalSample {
    pub time: f64,
    pub event: bool,
}

impl SurvivalSample {
    pub fn new(time: f64, event: bool) -> Self {
        Self { time, event }
    }

    pub fn event(time: f64) -> Self {
        Self::new(time, true)
    }

    pub fn censored(time: f64) -> Self {
        Self::new(time, false)
    }
}

/// Event and censoring counts at one distinct time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeStep {
    pub time: f64,
    pub events: usize,
    pub censored: usize,
}

impl TimeStep {
    fn record(&mut self, event: bool) {
        if event {
            self.events += 1;
        } else {
            self.censored += 1;
        }
    }

    pub fn leaving(&self) -> usize {
        self.events + self.censored
    }
}

/// Validates the samples and collapses them into ascending distinct times.
pub(crate) fn time_steps(samples: &[SurvivalSample]) -> Result<Vec<TimeStep>> {
    if samples.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if let Some(bad) = samples.iter().find(|s| !s.time.is_finite() || s.time < 0.0) {
        return Err(StatsError::InvalidTime(bad.time));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut steps: Vec<TimeStep> = Vec::new();
    for sample in sorted {
        match steps.last_mut() {
            Some(step) if step.time == sample.time => step.record(sample.event),
            _ => {
                let mut step = TimeStep {
                    time: sample.time,
                    events: 0,
                    censored: 0,
                };
                step.record(sample.event);
                steps.push(step);
            }
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_collapse_into_one_step() {
        let samples = [
            SurvivalSample::event(3.0),
            SurvivalSample::censored(1.0),
            SurvivalSample::event(3.0),
            SurvivalSample::censored(3.0),
        ];
        let steps = time_steps(&samples).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].time, 1.0);
        assert_eq!(steps[1].events, 2);
        assert_eq!(steps[1].censored, 1);
    }

    #[test]
    fn negative_time_is_rejected() {
        let result = time_steps(&[SurvivalSample::event(-1.0)]);
        assert_eq!(result, Err(StatsError::InvalidTime(-1.0)));
    }

    #[test]
    fn nan_time_is_rejected() {
        let result = time_steps(&[SurvivalSample::event(f64::NAN)]);
        assert!(matches!(result, Err(StatsError::InvalidTime(_))));
    }
}
