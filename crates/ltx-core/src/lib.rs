//! Pipeline stages for the lung transplant precompute.
//!
//! [`run`] is a pure function from loaded records to output datasets. The
//! geocoder, survival fitter and two-sample test are passed in through the
//! capability traits of `ltx-geo` and `ltx-stats`, so each stage can be
//! exercised with substitutes.
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Flow aggregation | [`flow`] | [`ltx_model::FlowAggregate`] |
//! | Survival and significance | [`survival`] | [`ltx_model::SurvivalPoint`], [`ltx_model::SignificanceResult`] |
//! | Donor utilization | [`utilization`] | [`ltx_model::UtilizationAggregate`], [`ltx_model::CasUtilization`], [`ltx_model::QualitySummary`] |

pub mod aggregate;
pub mod config;
mod error;
pub mod flow;
pub mod pipeline;
pub mod survival;
pub mod utilization;

pub use config::PipelineConfig;
pub use error::{CoreError, Result};
pub use pipeline::{PipelineInputs, PipelineOutputs, RunStats, run};
