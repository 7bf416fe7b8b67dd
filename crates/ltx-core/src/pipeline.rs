//! One pipeline run: source records in, output datasets out.
//!
//! The stages share nothing but the loaded records. Each runs inside its own
//! tracing span so per-stage logs can be told apart.

use serde::Serialize;
use tracing::{info, info_span};

use ltx_geo::CoordinateResolver;
use ltx_model::{
    CasUtilization, DonorRecord, FlowAggregate, QualitySummary, SignificanceResult,
    SurvivalPoint, TransplantRecord, UtilizationAggregate,
};
use ltx_stats::{SurvivalFitter, TwoSampleTest};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::flow::aggregate_flows;
use crate::survival::{analyze_survival, apply_horizon_censoring, qualifying_subjects};
use crate::utilization::summarize_utilization;

/// Source records of one run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInputs<'a> {
    pub transplants: &'a [TransplantRecord],
    pub donors: &'a [DonorRecord],
}

/// Counters describing what a run kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub transplant_records: usize,
    pub donor_records: usize,
    pub flow_records_skipped: usize,
    pub flow_groups_unresolved: usize,
    pub survival_subjects: usize,
    pub horizon_clipped: usize,
    pub horizon_excluded: usize,
    pub survival_strata: usize,
    pub survival_strata_skipped: usize,
    pub undefined_p_values: usize,
    pub donors_unclassified: usize,
    pub donors_incomplete: usize,
}

/// Every dataset a run produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutputs {
    pub flows: Vec<FlowAggregate>,
    pub survival_curves: Vec<SurvivalPoint>,
    pub significance: Vec<SignificanceResult>,
    pub utilization: Vec<UtilizationAggregate>,
    pub cas_utilization: Vec<CasUtilization>,
    pub quality_summary: Vec<QualitySummary>,
    pub stats: RunStats,
}

/// Runs every stage over the inputs.
///
/// Only an invalid configuration fails the run; per-record and per-stratum
/// problems are counted in [`RunStats`] and logged.
pub fn run<R, F, T>(
    inputs: PipelineInputs<'_>,
    config: &PipelineConfig,
    resolver: &mut R,
    fitter: &F,
    tester: &T,
) -> Result<PipelineOutputs>
where
    R: CoordinateResolver + ?Sized,
    F: SurvivalFitter + ?Sized,
    T: TwoSampleTest + ?Sized,
{
    config.validate()?;
    let mut stats = RunStats {
        transplant_records: inputs.transplants.len(),
        donor_records: inputs.donors.len(),
        ..RunStats::default()
    };

    let flows = info_span!("flows").in_scope(|| aggregate_flows(inputs.transplants, resolver));
    stats.flow_records_skipped = flows.skipped_records;
    stats.flow_groups_unresolved = flows.unresolved_groups;
    info!(rows = flows.rows.len(), "flow aggregation complete");

    let survival = info_span!("survival").in_scope(|| {
        let subjects = qualifying_subjects(inputs.transplants, config);
        let censored = apply_horizon_censoring(subjects, config.horizon_days);
        stats.survival_subjects = censored.subjects.len();
        stats.horizon_clipped = censored.clipped;
        stats.horizon_excluded = censored.excluded;
        analyze_survival(
            &censored.subjects,
            config.min_stratum_records,
            fitter,
            tester,
        )
    });
    stats.survival_strata = survival.strata;
    stats.survival_strata_skipped = survival.skipped_strata;
    stats.undefined_p_values = survival.undefined_tests;
    info!(
        subjects = stats.survival_subjects,
        strata = survival.strata,
        points = survival.curves.len(),
        "survival analysis complete"
    );

    let utilization = info_span!("utilization")
        .in_scope(|| summarize_utilization(inputs.donors, config.cas_cutover));
    stats.donors_unclassified = utilization.unclassified;
    stats.donors_incomplete = utilization.incomplete;
    info!(
        monthly = utilization.monthly.len(),
        periods = utilization.by_period.len(),
        "utilization summary complete"
    );

    Ok(PipelineOutputs {
        flows: flows.rows,
        survival_curves: survival.curves,
        significance: survival.significance,
        utilization: utilization.monthly,
        cas_utilization: utilization.by_period,
        quality_summary: utilization.quality,
        stats,
    })
}
