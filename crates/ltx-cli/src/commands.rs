use anyhow::{Context, Result};
use comfy_table::Table;

use ltx_cli::pipeline::{RunRequest, RunResult, execute};
use ltx_geo::{CoordinateResolver, Gazetteer, Geocoder};
use ltx_model::PostalCode;

use crate::cli::{GeocodeArgs, RunArgs};
use crate::summary::apply_table_style;

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    execute(&run_request(args))
}

fn run_request(args: &RunArgs) -> RunRequest {
    let mut request = RunRequest::from_data_dir(&args.data_dir);
    if let Some(path) = &args.transplants {
        request.transplants = path.clone();
    }
    if let Some(path) = &args.donors {
        request.donors = path.clone();
    }
    if let Some(path) = &args.gazetteer {
        request.gazetteer = path.clone();
    }
    if let Some(dir) = &args.output_dir {
        request.output_dir = dir.clone();
    }
    request.dry_run = args.dry_run;

    let mut config = request.config;
    let start = args.window_start.unwrap_or(config.window_start);
    let end = args.window_end.unwrap_or(config.window_end);
    config = config.with_window(start, end);
    if let Some(days) = args.horizon_days {
        config = config.with_horizon_days(days);
    }
    if let Some(size) = args.min_stratum_size {
        config = config.with_min_stratum_records(size);
    }
    if let Some(level) = args.confidence {
        config = config.with_confidence(level);
    }
    if let Some(date) = args.cas_date {
        config = config.with_cas_cutover(date);
    }
    request.config = config;
    request
}

pub fn run_geocode(args: &GeocodeArgs) -> Result<()> {
    let gazetteer = Gazetteer::from_path(&args.gazetteer)
        .with_context(|| format!("load gazetteer {}", args.gazetteer.display()))?;
    let mut geocoder = Geocoder::new(gazetteer);

    let mut table = Table::new();
    table.set_header(vec!["Input", "Postal code", "Latitude", "Longitude"]);
    apply_table_style(&mut table);
    for raw in &args.codes {
        let code = PostalCode::normalize(raw);
        let point = code.as_ref().and_then(|code| geocoder.resolve_code(code));
        let (lat, lon) = match point {
            Some(point) => (format!("{:.4}", point.lat), format!("{:.4}", point.lon)),
            None => ("-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            raw.clone(),
            code.map_or_else(|| "-".to_string(), |code| code.to_string()),
            lat,
            lon,
        ]);
    }
    println!("{table}");
    Ok(())
}
