//! One-call analytics report for a site
//!
//! Runs the whole pipeline (normalize, group, then every indicator) over one
//! dataset and collects the results. Nothing is cached: calling again with
//! the same inputs recomputes and returns an identical report.

use std::time::Instant;

use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

use crate::algorithm::grouping::group_by_patient;
use crate::algorithm::length_of_stay::{LengthOfStaySummary, length_of_stay_summary};
use crate::algorithm::normalize::{DataQualityReport, NormalizedEpisodes, normalize_records};
use crate::algorithm::occupancy::{OccupancySummary, ReportingWindow, occupancy_summary, reporting_window};
use crate::algorithm::readmission::{ReadmissionSummary, classify_readmissions};
use crate::algorithm::weekday::{WeekdayDistribution, weekday_distribution};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{AggregateResult, HospitalSite, RawEpisode};
use crate::utils::format::{format_decimal, format_percentage};

/// Every indicator computed for one site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub site: HospitalSite,
    /// Date the report was computed for; ongoing stays and the occupancy
    /// window are measured against it
    pub as_of: NaiveDate,
    pub total_episodes: usize,
    pub unidentified_episodes: usize,
    /// Admissions dated before the site's reporting floor
    pub admissions_before_floor: usize,
    pub length_of_stay: LengthOfStaySummary,
    pub readmission: ReadmissionSummary,
    /// `None` when no occupancy window can be formed
    pub occupancy: Option<OccupancySummary>,
    pub weekday: WeekdayDistribution,
    pub data_quality: DataQualityReport,
}

/// Normalize raw records and build the report for `site`
///
/// # Arguments
/// * `records` - Raw episode records for a single site
/// * `site` - Site the records belong to; selects capacity and floor date
/// * `config` - Readmission windows, ongoing stay policy and site settings
/// * `today` - Reference date for ongoing stays and the occupancy window
///
/// # Returns
/// The complete `AnalyticsReport`, or a configuration error when the
/// readmission windows are invalid
pub fn build_report(
    records: &[RawEpisode],
    site: HospitalSite,
    config: &AnalyticsConfig,
    today: NaiveDate,
) -> Result<AnalyticsReport> {
    let normalized = normalize_records(records, site);
    report_from_episodes(normalized, site, config, today)
}

/// Build the report from already normalized episodes
pub fn report_from_episodes(
    normalized: NormalizedEpisodes,
    site: HospitalSite,
    config: &AnalyticsConfig,
    today: NaiveDate,
) -> Result<AnalyticsReport> {
    let start = Instant::now();
    let windows = config.windows()?;
    let site_config = config.site(site);
    let NormalizedEpisodes {
        episodes,
        mut quality,
    } = normalized;

    info!(
        "Building analytics report for site {site} over {} episodes",
        episodes.len()
    );

    let length_of_stay = length_of_stay_summary(&episodes, config.ongoing_stay_policy(today));

    let groups = group_by_patient(&episodes);
    let readmission = classify_readmissions(&groups, &windows);
    quality.overlapping_episodes = readmission.overlapping_pairs;

    let occupancy = match reporting_window(&episodes, site_config.floor_date, today) {
        Some(ReportingWindow { start: from, end: to }) => Some(occupancy_summary(
            &episodes,
            site_config.capacity,
            from,
            to,
        )),
        None => {
            debug!("No occupancy window for site {site} as of {today}");
            None
        }
    };

    let admissions_before_floor = episodes
        .iter()
        .filter_map(|e| e.admission_date)
        .filter(|d| !site_config.is_date_reportable(*d))
        .count();

    let report = AnalyticsReport {
        site,
        as_of: today,
        total_episodes: episodes.len(),
        unidentified_episodes: quality.unidentified_episodes,
        admissions_before_floor,
        length_of_stay,
        readmission,
        occupancy,
        weekday: weekday_distribution(&episodes),
        data_quality: quality,
    };

    info!(
        "Report for site {site} ready in {:?}: {} eligible discharges, {} data quality issues",
        start.elapsed(),
        report.readmission.eligible_discharges,
        report.data_quality.issue_count()
    );

    Ok(report)
}

impl AnalyticsReport {
    /// Period occupancy, 0 when no window could be formed
    #[must_use]
    pub fn occupancy_pct(&self) -> f64 {
        self.occupancy.as_ref().map_or(0.0, |o| o.average_pct)
    }

    /// Human readable summary using the configured decimal separator
    #[must_use]
    pub fn summary(&self, config: &AnalyticsConfig) -> String {
        let sep = config.decimal_separator;
        let pct = |value: f64| format_percentage(value, sep);

        let mut summary = String::from("Clinical Analytics Summary:\n");
        summary.push_str(&format!("  Site: {}\n", self.site));
        summary.push_str(&format!("  As Of: {}\n", self.as_of));
        summary.push_str(&format!("  Total Episodes: {}\n", self.total_episodes));
        summary.push_str(&format!(
            "  Unidentified Episodes: {}\n",
            self.unidentified_episodes
        ));
        summary.push_str(&format!(
            "  Average Length of Stay: {} days ({} episodes)\n",
            format_decimal(self.length_of_stay.average_days, 1, sep),
            self.length_of_stay.included
        ));

        summary.push_str("\nReadmissions:\n");
        summary.push_str(&format!(
            "  Eligible Discharges: {}\n",
            self.readmission.eligible_discharges
        ));
        for window in &self.readmission.windows {
            summary.push_str(&format!(
                "  Within {} days: {} ({})\n",
                window.window_days,
                pct(window.rate),
                window.readmissions
            ));
        }
        summary.push_str(&format!(
            "  Excluded Pairs: {}\n",
            self.readmission.excluded_pairs()
        ));

        summary.push_str("\nOccupancy:\n");
        match &self.occupancy {
            Some(occupancy) => {
                summary.push_str(&format!(
                    "  Period: {} to {}\n",
                    occupancy.period_start, occupancy.period_end
                ));
                summary.push_str(&format!("  Capacity: {} beds\n", occupancy.capacity));
                summary.push_str(&format!("  Average: {}\n", pct(occupancy.average_pct)));
            }
            None => summary.push_str("  No reporting period available\n"),
        }

        summary.push_str("\nDischarges by Weekday:\n");
        for point in self.weekday.to_chart_points() {
            summary.push_str(&format!(
                "  {}: {} ({})\n",
                point.name,
                pct(point.value),
                point.count
            ));
        }

        let issues = self.data_quality.issue_count();
        if issues > 0 {
            summary.push_str(&format!("\nData Quality Issues: {issues}\n"));
        }

        summary
    }
}

impl From<&AnalyticsReport> for AggregateResult {
    fn from(report: &AnalyticsReport) -> Self {
        Self {
            average_stay_days: report.length_of_stay.average_days,
            readmission_rate_7: report.readmission.rate(7),
            readmission_rate_15: report.readmission.rate(15),
            readmission_rate_30: report.readmission.rate(30),
            occupancy_rate_pct: report.occupancy_pct(),
            weekday_distribution: report.weekday.to_chart_points(),
        }
    }
}
