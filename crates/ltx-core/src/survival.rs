//! Graft survival curves and per-OPO significance.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use ltx_model::{NATIONWIDE_GROUP, SignificanceResult, SurvivalPoint, TransplantRecord};
use ltx_stats::{SurvivalCurve, SurvivalFitter, SurvivalSample, TwoSampleTest};

use crate::config::PipelineConfig;

/// A transplant that qualifies for survival analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub opo: String,
    pub sample: SurvivalSample,
}

/// Windowed DBD transplants with a non-negative graft time and a known
/// outcome.
pub fn qualifying_subjects(records: &[TransplantRecord], config: &PipelineConfig) -> Vec<Subject> {
    records
        .iter()
        .filter(|record| record.is_dbd())
        .filter(|record| {
            record
                .transplant_date
                .is_some_and(|date| config.in_window(date))
        })
        .filter_map(|record| {
            let time = record.graft_time.filter(|time| *time >= 0.0)?;
            let event = record.graft_failed?;
            Some(Subject {
                opo: record.donor_opo.clone(),
                sample: SurvivalSample::new(time, event),
            })
        })
        .collect()
}

/// Subjects after the follow-up horizon was applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HorizonCensoring {
    pub subjects: Vec<Subject>,
    /// Censored subjects whose time was clipped to the horizon.
    pub clipped: usize,
    /// Subjects whose event happened after the horizon.
    pub excluded: usize,
}

/// Clips censored times beyond the horizon, then drops events beyond it.
pub fn apply_horizon_censoring(subjects: Vec<Subject>, horizon: f64) -> HorizonCensoring {
    let mut clipped = 0usize;
    let mut excluded = 0usize;
    let subjects = subjects
        .into_iter()
        .map(|mut subject| {
            if subject.sample.time > horizon && !subject.sample.event {
                subject.sample.time = horizon;
                clipped += 1;
            }
            subject
        })
        .filter(|subject| {
            let keep = subject.sample.time <= horizon;
            if !keep {
                excluded += 1;
            }
            keep
        })
        .collect();
    HorizonCensoring {
        subjects,
        clipped,
        excluded,
    }
}

/// Curves and p-values for the whole population and each large OPO.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurvivalAnalysis {
    pub curves: Vec<SurvivalPoint>,
    pub significance: Vec<SignificanceResult>,
    /// OPOs with their own curve.
    pub strata: usize,
    /// OPOs with too few qualifying records.
    pub skipped_strata: usize,
    /// OPOs whose log-rank test was degenerate.
    pub undefined_tests: usize,
}

/// Fits the nationwide curve and one curve per OPO with more than
/// `min_stratum_records` subjects, testing each such OPO against the rest.
pub fn analyze_survival<F, T>(
    subjects: &[Subject],
    min_stratum_records: usize,
    fitter: &F,
    tester: &T,
) -> SurvivalAnalysis
where
    F: SurvivalFitter + ?Sized,
    T: TwoSampleTest + ?Sized,
{
    let mut analysis = SurvivalAnalysis::default();

    let all: Vec<SurvivalSample> = subjects.iter().map(|subject| subject.sample).collect();
    match fitter.fit_survival(&all) {
        Ok(curve) => push_curve(&mut analysis.curves, NATIONWIDE_GROUP, &curve),
        Err(error) => warn!(%error, "no nationwide survival curve"),
    }

    let mut stratum_sizes: BTreeMap<&str, usize> = BTreeMap::new();
    for subject in subjects {
        *stratum_sizes.entry(subject.opo.as_str()).or_insert(0) += 1;
    }

    for (&opo, &size) in &stratum_sizes {
        if size <= min_stratum_records {
            analysis.skipped_strata += 1;
            debug!(opo, records = size, "stratum too small");
            continue;
        }
        let (stratum, rest): (Vec<_>, Vec<_>) =
            subjects.iter().partition(|subject| subject.opo == opo);
        let stratum: Vec<SurvivalSample> = stratum.iter().map(|subject| subject.sample).collect();
        let rest: Vec<SurvivalSample> = rest.iter().map(|subject| subject.sample).collect();

        let curve = match fitter.fit_survival(&stratum) {
            Ok(curve) => curve,
            Err(error) => {
                warn!(opo, %error, "survival fit failed; stratum skipped");
                analysis.skipped_strata += 1;
                continue;
            }
        };
        push_curve(&mut analysis.curves, opo, &curve);
        analysis.strata += 1;

        let p_value = match tester.logrank(&stratum, &rest) {
            Ok(test) if test.p_value.is_finite() => Some(test.p_value),
            Ok(test) => {
                debug!(opo, statistic = test.statistic, "non-finite log-rank p-value");
                None
            }
            Err(error) => {
                debug!(opo, %error, "log-rank test undefined");
                None
            }
        };
        if p_value.is_none() {
            analysis.undefined_tests += 1;
        }
        analysis.significance.push(SignificanceResult {
            opo: opo.to_string(),
            p_value,
        });
    }

    analysis
}

fn push_curve(out: &mut Vec<SurvivalPoint>, group: &str, curve: &SurvivalCurve) {
    out.extend(curve.points.iter().map(|point| SurvivalPoint {
        group: group.to_string(),
        graft_time: point.time,
        survival_prob: point.survival,
        ci_lower: point.lower,
        ci_upper: point.upper,
    }));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ltx_model::DonationType;
    use ltx_stats::{KaplanMeier, LogRank};
    use proptest::prelude::*;

    use super::*;

    fn subject(opo: &str, time: f64, event: bool) -> Subject {
        Subject {
            opo: opo.to_string(),
            sample: SurvivalSample::new(time, event),
        }
    }

    fn transplant(date: (i32, u32, u32), time: Option<f64>, failed: Option<bool>) -> TransplantRecord {
        TransplantRecord {
            transplant_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            donation: Some(DonationType::Dbd),
            graft_time: time,
            graft_failed: failed,
            ..TransplantRecord::new("CAOP")
        }
    }

    #[test]
    fn qualifying_filter() {
        let mut dcd = transplant((2020, 1, 1), Some(10.0), Some(true));
        dcd.donation = Some(DonationType::Dcd);
        let records = vec![
            transplant((2018, 1, 1), Some(10.0), Some(true)),
            transplant((2024, 12, 31), Some(0.0), Some(false)),
            transplant((2017, 12, 31), Some(10.0), Some(true)),
            transplant((2025, 1, 1), Some(10.0), Some(true)),
            transplant((2020, 1, 1), Some(-1.0), Some(true)),
            transplant((2020, 1, 1), None, Some(true)),
            transplant((2020, 1, 1), Some(10.0), None),
            dcd,
        ];
        let subjects = qualifying_subjects(&records, &PipelineConfig::default());
        assert_eq!(subjects.len(), 2);
    }

    #[test]
    fn censored_beyond_horizon_is_clipped_event_is_dropped() {
        let result = apply_horizon_censoring(
            vec![
                subject("A", 2000.0, false),
                subject("A", 2000.0, true),
                subject("A", 1825.0, true),
                subject("A", 100.0, false),
            ],
            1825.0,
        );
        assert_eq!(result.clipped, 1);
        assert_eq!(result.excluded, 1);
        assert_eq!(
            result.subjects,
            vec![
                subject("A", 1825.0, false),
                subject("A", 1825.0, true),
                subject("A", 100.0, false),
            ]
        );
    }

    #[test]
    fn small_strata_get_no_curve() {
        let mut subjects: Vec<Subject> = (0..11)
            .map(|i| subject("BIG", f64::from(i * 50 + 10), i % 2 == 0))
            .collect();
        subjects.extend((0..10).map(|i| subject("SMALL", f64::from(i * 40 + 5), i % 3 == 0)));

        let analysis = analyze_survival(&subjects, 10, &KaplanMeier::default(), &LogRank);
        assert!(analysis.curves.iter().any(|p| p.group == NATIONWIDE_GROUP));
        assert!(analysis.curves.iter().any(|p| p.group == "BIG"));
        assert!(!analysis.curves.iter().any(|p| p.group == "SMALL"));
        assert_eq!(analysis.significance.len(), 1);
        assert_eq!(analysis.strata, 1);
        assert_eq!(analysis.skipped_strata, 1);
    }

    #[test]
    fn degenerate_test_is_undefined_not_fatal() {
        // The complement is empty when only one OPO qualifies.
        let subjects: Vec<Subject> = (0..12)
            .map(|i| subject("ONLY", f64::from(i + 1), true))
            .collect();
        let analysis = analyze_survival(&subjects, 10, &KaplanMeier::default(), &LogRank);
        assert_eq!(
            analysis.significance,
            vec![SignificanceResult {
                opo: "ONLY".to_string(),
                p_value: None,
            }]
        );
        assert_eq!(analysis.undefined_tests, 1);
    }

    #[test]
    fn empty_population_yields_nothing() {
        let analysis = analyze_survival(&[], 10, &KaplanMeier::default(), &LogRank);
        assert!(analysis.curves.is_empty());
        assert!(analysis.significance.is_empty());
    }

    fn subjects_strategy() -> impl Strategy<Value = Vec<Subject>> {
        prop::collection::vec(
            (0.0f64..4000.0, any::<bool>()).prop_map(|(time, event)| subject("X", time, event)),
            0..60,
        )
    }

    proptest! {
        #[test]
        fn horizon_censoring_is_idempotent(subjects in subjects_strategy(), horizon in 1.0f64..3000.0) {
            let once = apply_horizon_censoring(subjects, horizon);
            let twice = apply_horizon_censoring(once.subjects.clone(), horizon);
            prop_assert_eq!(&twice.subjects, &once.subjects);
            prop_assert_eq!(twice.clipped, 0);
            prop_assert_eq!(twice.excluded, 0);
        }

        #[test]
        fn no_time_exceeds_the_horizon(subjects in subjects_strategy(), horizon in 1.0f64..3000.0) {
            let result = apply_horizon_censoring(subjects, horizon);
            prop_assert!(result.subjects.iter().all(|s| s.sample.time <= horizon));
        }
    }
}
