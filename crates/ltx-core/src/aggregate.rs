//! Accumulators shared by the aggregation stages.

use ltx_model::ScoreStats;

/// Running mean of boolean flags; absent flags are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateAccumulator {
    hits: u32,
    observed: u32,
}

impl RateAccumulator {
    pub fn push(&mut self, flag: Option<bool>) {
        if let Some(flag) = flag {
            self.observed += 1;
            if flag {
                self.hits += 1;
            }
        }
    }

    /// Share of present flags that are set; `None` when no flag was present.
    pub fn rate(&self) -> Option<f64> {
        (self.observed > 0).then(|| f64::from(self.hits) / f64::from(self.observed))
    }
}

/// Mean, median and count of the finite values.
pub fn score_stats(values: &[f64]) -> ScoreStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return ScoreStats::default();
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    ScoreStats {
        mean: Some(mean),
        median: Some(median),
        count: u32::try_from(count).unwrap_or(u32::MAX),
    }
}

/// `used / total`, or 0 for an empty group.
pub fn ratio(used: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(used) / f64::from(total)
    }
}
