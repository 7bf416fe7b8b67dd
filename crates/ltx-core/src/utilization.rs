//! Donor utilization and donor-quality summaries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use ltx_model::{
    CasPeriod, CasUtilization, DonationType, DonorRecord, QualitySummary, UtilizationAggregate,
};

use crate::aggregate::{RateAccumulator, ratio, score_stats};

/// A donor with a recovery date, placed in its CAS period.
#[derive(Debug, Clone, Copy)]
struct Classified<'a> {
    donor: &'a DonorRecord,
    year: i32,
    month: u32,
    period: CasPeriod,
}

#[derive(Debug, Default)]
struct UtilizationGroup {
    total: u32,
    used: u32,
    dcu: RateAccumulator,
    scores: Vec<f64>,
}

impl UtilizationGroup {
    /// Counts the donor toward the rate only when its outcome is known; the
    /// DCU flag and score are kept either way.
    fn push(&mut self, donor: &DonorRecord) {
        if let Some(used) = donor.transplanted {
            self.total += 1;
            if used {
                self.used += 1;
            }
        }
        self.dcu.push(donor.dcu);
        self.scores.extend(donor.quality_score());
    }
}

/// All utilization tables derived from the donor extract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtilizationSummary {
    pub monthly: Vec<UtilizationAggregate>,
    pub by_period: Vec<CasUtilization>,
    pub quality: Vec<QualitySummary>,
    /// Donors without a recovery date.
    pub unclassified: usize,
    /// Classified donors without a donation type or used outcome. Those
    /// without a donation type are left out of the utilization tables.
    pub incomplete: usize,
}

/// Builds the monthly table, the CAS period rollup and the LUNDON summary.
pub fn summarize_utilization(donors: &[DonorRecord], cas_cutover: NaiveDate) -> UtilizationSummary {
    let mut unclassified = 0usize;
    let classified: Vec<Classified<'_>> = donors
        .iter()
        .filter_map(|donor| {
            let classified = classify(donor, cas_cutover);
            if classified.is_none() {
                unclassified += 1;
            }
            classified
        })
        .collect();

    let mut monthly: BTreeMap<(i32, u32, &str, CasPeriod, DonationType), UtilizationGroup> =
        BTreeMap::new();
    let mut by_period: BTreeMap<(&str, CasPeriod), UtilizationGroup> = BTreeMap::new();
    let mut quality: BTreeMap<(&str, CasPeriod), Vec<f64>> = BTreeMap::new();
    let mut incomplete = 0usize;

    for entry in &classified {
        let opo = entry.donor.opo.as_str();
        if let Some(score) = entry.donor.quality_score() {
            quality.entry((opo, entry.period)).or_default().push(score);
        }

        if entry.donor.donation.is_none() || entry.donor.transplanted.is_none() {
            incomplete += 1;
        }
        let Some(donation) = entry.donor.donation else {
            continue;
        };
        monthly
            .entry((entry.year, entry.month, opo, entry.period, donation))
            .or_default()
            .push(entry.donor);
        by_period
            .entry((opo, entry.period))
            .or_default()
            .push(entry.donor);
    }

    let monthly: Vec<UtilizationAggregate> = monthly
        .into_iter()
        .map(
            |((year, month, opo, cas_period, donation), group)| UtilizationAggregate {
                year,
                month,
                opo: opo.to_string(),
                cas_period,
                donation,
                total_donors: group.total,
                used_donors: group.used,
                utilization_rate: ratio(group.used, group.total),
                dcu_rate: group.dcu.rate(),
                lundon: score_stats(&group.scores),
            },
        )
        .collect();

    let by_period: Vec<CasUtilization> = by_period
        .into_iter()
        .map(|((opo, cas_period), group)| CasUtilization {
            opo: opo.to_string(),
            cas_period,
            total: group.total,
            used: group.used,
            utilization: ratio(group.used, group.total),
        })
        .collect();

    let quality: Vec<QualitySummary> = quality
        .into_iter()
        .map(|((opo, cas_period), scores)| QualitySummary {
            opo: opo.to_string(),
            cas_period,
            lundon: score_stats(&scores),
        })
        .collect();

    debug!(
        monthly = monthly.len(),
        periods = by_period.len(),
        quality = quality.len(),
        unclassified,
        incomplete,
        "summarized donor utilization"
    );
    UtilizationSummary {
        monthly,
        by_period,
        quality,
        unclassified,
        incomplete,
    }
}

fn classify(donor: &DonorRecord, cas_cutover: NaiveDate) -> Option<Classified<'_>> {
    let date = donor.recovery_date?;
    let (year, month) = donor.period()?;
    Some(Classified {
        donor,
        year,
        month,
        period: CasPeriod::classify(date, cas_cutover),
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::DEFAULT_CAS_CUTOVER as CUTOVER;

    fn donor(
        opo: &str,
        date: (i32, u32, u32),
        donation: DonationType,
        used: bool,
        score: Option<f64>,
    ) -> DonorRecord {
        DonorRecord::new(
            opo,
            NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            Some(donation),
            Some(used),
            Some(false),
            score,
        )
    }

    #[test]
    fn cutover_day_is_post_cas() {
        let donors = vec![
            donor("MWOB", (2023, 3, 9), DonationType::Dbd, true, None),
            donor("MWOB", (2023, 3, 8), DonationType::Dbd, false, None),
        ];
        let summary = summarize_utilization(&donors, CUTOVER);
        let periods: Vec<_> = summary
            .by_period
            .iter()
            .map(|row| (row.cas_period, row.total, row.used))
            .collect();
        assert_eq!(
            periods,
            vec![(CasPeriod::PreCas, 1, 0), (CasPeriod::PostCas, 1, 1)]
        );
    }

    #[test]
    fn monthly_groups_split_by_donation_type() {
        let donors = vec![
            donor("MWOB", (2022, 5, 1), DonationType::Dbd, true, Some(1.0)),
            donor("MWOB", (2022, 5, 20), DonationType::Dbd, false, Some(2.0)),
            donor("MWOB", (2022, 5, 21), DonationType::Dcd, true, None),
        ];
        let summary = summarize_utilization(&donors, CUTOVER);
        assert_eq!(summary.monthly.len(), 2);

        let dbd = &summary.monthly[0];
        assert_eq!(dbd.donation, DonationType::Dbd);
        assert_eq!((dbd.total_donors, dbd.used_donors), (2, 1));
        assert_eq!(dbd.utilization_rate, 0.5);
        assert_eq!(dbd.dcu_rate, Some(0.0));
        assert_eq!(dbd.lundon.mean, Some(1.5));
        assert_eq!(dbd.lundon.median, Some(1.5));
        assert_eq!(dbd.lundon.count, 2);

        let dcd = &summary.monthly[1];
        assert_eq!(dcd.donation, DonationType::Dcd);
        assert_eq!(dcd.lundon.count, 0);
        assert_eq!(dcd.lundon.mean, None);
    }

    #[test]
    fn dcd_scores_never_reach_lundon_aggregates() {
        let donors = vec![
            donor("MWOB", (2022, 5, 1), DonationType::Dcd, true, Some(9.0)),
            donor("MWOB", (2022, 5, 2), DonationType::Dbd, true, Some(1.0)),
        ];
        let summary = summarize_utilization(&donors, CUTOVER);
        assert!(
            summary
                .monthly
                .iter()
                .all(|row| row.lundon.mean.is_none_or(|mean| mean < 9.0))
        );
        assert_eq!(summary.quality.len(), 1);
        assert_eq!(summary.quality[0].lundon.count, 1);
        assert_eq!(summary.quality[0].lundon.mean, Some(1.0));
    }

    #[test]
    fn donors_without_date_or_outcome_are_counted() {
        let donors = vec![
            DonorRecord::new("MWOB", None, Some(DonationType::Dbd), Some(true), None, None),
            DonorRecord::new(
                "MWOB",
                NaiveDate::from_ymd_opt(2022, 1, 1),
                Some(DonationType::Dbd),
                None,
                None,
                Some(1.2),
            ),
        ];
        let summary = summarize_utilization(&donors, CUTOVER);
        assert_eq!(summary.unclassified, 1);
        assert_eq!(summary.incomplete, 1);
        assert_eq!(summary.quality[0].lundon.count, 1);

        let row = &summary.monthly[0];
        assert_eq!((row.total_donors, row.used_donors), (0, 0));
        assert_eq!(row.utilization_rate, 0.0);
        assert_eq!(row.lundon.count, 1);
        assert_eq!(summary.by_period[0].total, 0);
    }

    #[test]
    fn donor_without_outcome_keeps_score_and_dcu_in_monthly_row() {
        let donors = vec![
            DonorRecord::new(
                "MWOB",
                NaiveDate::from_ymd_opt(2022, 1, 5),
                Some(DonationType::Dbd),
                Some(true),
                Some(false),
                Some(1.0),
            ),
            DonorRecord::new(
                "MWOB",
                NaiveDate::from_ymd_opt(2022, 1, 20),
                Some(DonationType::Dbd),
                None,
                Some(true),
                Some(3.0),
            ),
        ];
        let summary = summarize_utilization(&donors, CUTOVER);
        assert_eq!(summary.monthly.len(), 1);
        let monthly = &summary.monthly[0];
        let quality = &summary.quality[0];

        assert_eq!((monthly.total_donors, monthly.used_donors), (1, 1));
        assert_eq!(monthly.utilization_rate, 1.0);
        assert_eq!(monthly.dcu_rate, Some(0.5));
        assert_eq!(monthly.lundon.count, quality.lundon.count);
        assert_eq!(monthly.lundon.mean, Some(2.0));
        assert_eq!(monthly.lundon, quality.lundon);
        assert_eq!(summary.incomplete, 1);
    }

    #[test]
    fn donor_without_donation_type_is_left_out() {
        let donors = vec![DonorRecord::new(
            "MWOB",
            NaiveDate::from_ymd_opt(2022, 1, 5),
            None,
            Some(true),
            Some(true),
            Some(1.0),
        )];
        let summary = summarize_utilization(&donors, CUTOVER);
        assert!(summary.monthly.is_empty());
        assert!(summary.by_period.is_empty());
        assert_eq!(summary.incomplete, 1);
    }

    #[test]
    fn dcu_rate_is_undefined_without_flags() {
        let donors = vec![DonorRecord::new(
            "MWOB",
            NaiveDate::from_ymd_opt(2022, 1, 1),
            Some(DonationType::Dcd),
            Some(true),
            None,
            None,
        )];
        let summary = summarize_utilization(&donors, CUTOVER);
        assert_eq!(summary.monthly[0].dcu_rate, None);
    }

    fn donors_strategy() -> impl Strategy<Value = Vec<DonorRecord>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["CAOP", "MWOB", "NYRT"]),
                0i64..2500,
                any::<bool>(),
                any::<bool>(),
            )
                .prop_map(|(opo, offset, is_dcd, used)| {
                    let base = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
                    DonorRecord::new(
                        opo,
                        base.checked_add_days(chrono::Days::new(offset as u64)),
                        Some(DonationType::from_dcd_flag(is_dcd)),
                        Some(used),
                        Some(used),
                        Some(1.0),
                    )
                }),
            0..100,
        )
    }

    proptest! {
        #[test]
        fn utilization_rate_is_used_over_total(donors in donors_strategy()) {
            let summary = summarize_utilization(&donors, CUTOVER);
            for row in &summary.monthly {
                prop_assert!(row.used_donors <= row.total_donors);
                prop_assert_eq!(
                    row.utilization_rate,
                    f64::from(row.used_donors) / f64::from(row.total_donors)
                );
                prop_assert!((0.0..=1.0).contains(&row.utilization_rate));
            }
            let monthly_total: u32 = summary.monthly.iter().map(|row| row.total_donors).sum();
            let period_total: u32 = summary.by_period.iter().map(|row| row.total).sum();
            prop_assert_eq!(monthly_total, period_total);
        }
    }
}
