//! OPO to transplant center flows.
//!
//! Two passes over the DBD transplants:
//!
//! 1. count transplants per (year, month, OPO, center, OPO zip, center zip);
//! 2. average the DCU flag per (year, month, OPO, center), over every DBD
//!    transplant of that pair whether or not its zips are usable.
//!
//! The second pass is joined back onto the first by its key. Groups are then
//! geocoded and dropped unless both endpoints resolve.

use std::collections::BTreeMap;

use tracing::debug;

use ltx_geo::CoordinateResolver;
use ltx_model::{FlowAggregate, PostalCode, TransplantRecord};

use crate::aggregate::RateAccumulator;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PairKey {
    year: i32,
    month: u32,
    opo: String,
    center: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct FlowKey {
    pair: PairKey,
    opo_zip: PostalCode,
    center_zip: PostalCode,
}

/// Flow rows plus what was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowAggregation {
    pub rows: Vec<FlowAggregate>,
    /// DBD transplants without a usable date, center or zip.
    pub skipped_records: usize,
    /// Groups dropped because an endpoint did not geocode.
    pub unresolved_groups: usize,
}

/// Aggregates DBD transplant flows and geocodes both endpoints.
pub fn aggregate_flows<R>(records: &[TransplantRecord], resolver: &mut R) -> FlowAggregation
where
    R: CoordinateResolver + ?Sized,
{
    let mut counts: BTreeMap<FlowKey, u32> = BTreeMap::new();
    let mut dcu: BTreeMap<PairKey, RateAccumulator> = BTreeMap::new();
    let mut skipped_records = 0usize;

    for record in records.iter().filter(|record| record.is_dbd()) {
        let Some(pair) = pair_key(record) else {
            skipped_records += 1;
            continue;
        };
        dcu.entry(pair.clone()).or_default().push(record.any_dcu);

        let opo_zip = record.opo_zip.as_deref().and_then(PostalCode::normalize);
        let center_zip = record.center_zip.as_deref().and_then(PostalCode::normalize);
        let (Some(opo_zip), Some(center_zip)) = (opo_zip, center_zip) else {
            skipped_records += 1;
            continue;
        };
        *counts
            .entry(FlowKey {
                pair,
                opo_zip,
                center_zip,
            })
            .or_insert(0) += 1;
    }

    let mut rows = Vec::with_capacity(counts.len());
    let mut unresolved_groups = 0usize;
    for (key, count) in counts {
        let opo_point = resolver.resolve_code(&key.opo_zip);
        let center_point = resolver.resolve_code(&key.center_zip);
        let (Some(opo_point), Some(center_point)) = (opo_point, center_point) else {
            unresolved_groups += 1;
            continue;
        };
        let dcu_rate = dcu
            .get(&key.pair)
            .and_then(RateAccumulator::rate)
            .unwrap_or(0.0);
        rows.push(FlowAggregate {
            year: key.pair.year,
            month: key.pair.month,
            opo: key.pair.opo,
            opo_zip: key.opo_zip,
            opo_point,
            center: key.pair.center,
            center_zip: key.center_zip,
            center_point,
            count,
            dcu_rate,
        });
    }

    debug!(
        rows = rows.len(),
        skipped_records, unresolved_groups, "aggregated transplant flows"
    );
    FlowAggregation {
        rows,
        skipped_records,
        unresolved_groups,
    }
}

fn pair_key(record: &TransplantRecord) -> Option<PairKey> {
    let (year, month) = record.period()?;
    let center = record.center.clone()?;
    Some(PairKey {
        year,
        month,
        opo: record.donor_opo.clone(),
        center,
    })
}
