//! CLI argument definitions for `ltx-precompute`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ltx-precompute",
    version,
    about = "Precompute lung transplant registry datasets for the dashboard",
    long_about = "Precompute lung transplant registry datasets for the dashboard.\n\n\
                  Builds geocoded OPO-to-center flows, Kaplan-Meier graft survival curves\n\
                  with log-rank tests, and donor utilization summaries as flat CSV files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline and write every dataset.
    Run(RunArgs),

    /// Resolve postal codes against a gazetteer.
    Geocode(GeocodeArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding LU_REC_MAP.csv, LU_DON_MAP.csv and US.txt.
    #[arg(value_name = "DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Transplant-level extract (default: <DATA_DIR>/LU_REC_MAP.csv).
    #[arg(long = "transplants", value_name = "PATH")]
    pub transplants: Option<PathBuf>,

    /// Donor-level extract (default: <DATA_DIR>/LU_DON_MAP.csv).
    #[arg(long = "donors", value_name = "PATH")]
    pub donors: Option<PathBuf>,

    /// GeoNames postal code gazetteer (default: <DATA_DIR>/US.txt).
    #[arg(long = "gazetteer", value_name = "PATH")]
    pub gazetteer: Option<PathBuf>,

    /// Output directory (default: <DATA_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compute and summarize without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// First transplant date of the survival window (YYYY-MM-DD).
    #[arg(long = "window-start", value_name = "DATE")]
    pub window_start: Option<NaiveDate>,

    /// Last transplant date of the survival window, inclusive (YYYY-MM-DD).
    #[arg(long = "window-end", value_name = "DATE")]
    pub window_end: Option<NaiveDate>,

    /// Follow-up horizon in days.
    #[arg(long = "horizon-days", value_name = "DAYS")]
    pub horizon_days: Option<f64>,

    /// OPOs need more qualifying transplants than this for their own curve.
    #[arg(long = "min-stratum-size", value_name = "N")]
    pub min_stratum_size: Option<usize>,

    /// Confidence level of the survival bounds.
    #[arg(long = "confidence", value_name = "LEVEL")]
    pub confidence: Option<f64>,

    /// CAS cutover date; recoveries on or after it are Post-CAS (YYYY-MM-DD).
    #[arg(long = "cas-date", value_name = "DATE")]
    pub cas_date: Option<NaiveDate>,
}

#[derive(Parser)]
pub struct GeocodeArgs {
    /// GeoNames postal code gazetteer.
    #[arg(value_name = "GAZETTEER")]
    pub gazetteer: PathBuf,

    /// Postal codes to resolve.
    #[arg(value_name = "ZIP", required = true)]
    pub codes: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "ltx-precompute",
            "run",
            "data",
            "--window-start",
            "2019-01-01",
            "--horizon-days",
            "365",
            "--cas-date",
            "2023-03-09",
            "--dry-run",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.window_start, NaiveDate::from_ymd_opt(2019, 1, 1));
        assert_eq!(args.horizon_days, Some(365.0));
        assert!(args.dry_run);
    }

    #[test]
    fn geocode_requires_a_code() {
        assert!(Cli::try_parse_from(["ltx-precompute", "geocode", "US.txt"]).is_err());
    }
}
