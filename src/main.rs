//! `ward-metrics`: compute the clinical indicators for one site and print
//! them as JSON.
//!
//! Usage: `ward-metrics <SITE> <PATH>...`, where each path is a `.json` or
//! `.parquet` episode file or a directory holding such files. The report
//! date defaults to today and can be pinned with `WARD_METRICS_AS_OF`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use log::info;
use serde_json::json;

use ward_metrics::algorithm::build_report;
use ward_metrics::loader::{find_episode_files, load_episode_files_parallel};
use ward_metrics::utils::logging::init_logging;
use ward_metrics::{AggregateResult, AnalyticsConfig, HospitalSite};

const AS_OF_ENV_VAR: &str = "WARD_METRICS_AS_OF";

fn report_date() -> anyhow::Result<NaiveDate> {
    match std::env::var(AS_OF_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .with_context(|| format!("{AS_OF_ENV_VAR} must be YYYY-MM-DD, got '{value}'")),
        _ => Ok(chrono::Local::now().date_naive()),
    }
}

fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = PathBuf::from(input);
        if path.is_dir() {
            files.extend(
                find_episode_files(&path)
                    .with_context(|| format!("Failed to list episode files in {}", path.display()))?,
            );
        } else {
            files.push(path);
        }
    }
    Ok(files)
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((site, inputs)) = args.split_first() else {
        bail!("usage: ward-metrics <SITE> <PATH>...");
    };
    if inputs.is_empty() {
        bail!("usage: ward-metrics <SITE> <PATH>...");
    }

    let site: HospitalSite = site.parse().context("Invalid site argument")?;
    let config = AnalyticsConfig::from_env().context("Failed to load analytics configuration")?;
    let today = report_date()?;
    info!("{config}");

    let start = Instant::now();
    let files = expand_inputs(inputs)?;
    let records = load_episode_files_parallel(&files).context("Failed to load episode files")?;

    let report = build_report(&records, site, &config, today)
        .with_context(|| format!("Failed to build report for site {site}"))?;
    for line in report.summary(&config).lines() {
        info!("{line}");
    }

    let aggregate = AggregateResult::from(&report);
    let output = json!({
        "aggregate": aggregate,
        "formatted": aggregate.formatted(config.decimal_separator),
        "report": report,
        "gap_distribution": report.readmission.gap_distribution(),
        "occupancy_by_month": report.occupancy.as_ref().map(|o| o.monthly_points()),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize report")?
    );

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
