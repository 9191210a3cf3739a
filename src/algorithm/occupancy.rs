//! Bed occupancy estimation
//!
//! A daily census counts unique patients in a bed on each day of every
//! whole calendar month the reporting window touches. Daily rates are
//! averaged per month, and the period rate is the mean of the monthly
//! averages, so every month weighs the same regardless of its length.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::models::{ChartPoint, Episode};
use crate::utils::calendar::{YearMonth, end_of_previous_month, months_between};
use crate::utils::format::round_one_decimal;

/// Inclusive date range an occupancy report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Work out the reporting window for a dataset
///
/// Starts at the later of the earliest admission and the site's floor date,
/// ends on the last day of the month before `today`. Returns `None` when no
/// episode has an admission date or the window would be empty.
#[must_use]
pub fn reporting_window(
    episodes: &[Episode],
    floor: NaiveDate,
    today: NaiveDate,
) -> Option<ReportingWindow> {
    let earliest = episodes.iter().filter_map(|e| e.admission_date).min()?;
    let start = earliest.max(floor);
    let end = end_of_previous_month(today);

    (start <= end).then_some(ReportingWindow { start, end })
}

/// Token a patient is counted under in the census
///
/// Card holders are deduplicated; anyone else counts once per record so
/// unidentified patients are not undercounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CensusToken<'a> {
    Card(&'a str),
    Record(usize),
}

fn census_token(episode: &Episode) -> CensusToken<'_> {
    match episode.patient_key.health_card() {
        Some(card) => CensusToken::Card(card),
        None => CensusToken::Record(episode.record_index),
    }
}

/// Unique patients occupying a bed on `day`
#[must_use]
pub fn daily_census(episodes: &[Episode], day: NaiveDate) -> usize {
    episodes
        .iter()
        .filter(|e| e.occupies(day))
        .map(census_token)
        .collect::<FxHashSet<_>>()
        .len()
}

/// Occupancy for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOccupancy {
    pub year: i32,
    pub month: u32,
    /// Days in the month
    pub days: u32,
    /// Mean daily rate as a percentage
    pub average_pct: f64,
    pub peak_census: usize,
}

/// Result of [`occupancy_summary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancySummary {
    pub capacity: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub months: Vec<MonthlyOccupancy>,
    /// Mean of the monthly averages, as an unrounded percentage
    pub average_pct: f64,
}

impl OccupancySummary {
    fn empty(capacity: u32, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            capacity,
            period_start,
            period_end,
            months: Vec::new(),
            average_pct: 0.0,
        }
    }

    /// Period average rounded to one decimal for reporting
    #[must_use]
    pub fn rounded_pct(&self) -> f64 {
        round_one_decimal(self.average_pct)
    }

    /// Monthly averages as `{ name: "YYYY-MM", value }` chart points
    #[must_use]
    pub fn monthly_points(&self) -> Vec<ChartPoint> {
        self.months
            .iter()
            .map(|m| {
                ChartPoint::new(
                    YearMonth {
                        year: m.year,
                        month: m.month,
                    }
                    .label(),
                    round_one_decimal(m.average_pct),
                )
            })
            .collect()
    }
}

/// Monthly and period occupancy for the months `[period_start, period_end]` touches
///
/// # Arguments
/// * `episodes` - Normalized episodes for one site
/// * `capacity` - Number of beds at the site
/// * `period_start` - First day of the reporting window
/// * `period_end` - Last day of the reporting window
///
/// # Returns
/// An `OccupancySummary` with one entry per whole calendar month. Zero
/// capacity or an empty window yields a summary with a 0% average.
#[must_use]
pub fn occupancy_summary(
    episodes: &[Episode],
    capacity: u32,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> OccupancySummary {
    let mut summary = OccupancySummary::empty(capacity, period_start, period_end);
    if capacity == 0 || episodes.is_empty() || period_start > period_end {
        return summary;
    }

    let beds = f64::from(capacity);
    for month in months_between(period_start, period_end) {
        let first = month.first_day();
        let last = month.last_day();

        let mut days = 0u32;
        let mut rate_sum = 0.0;
        let mut peak_census = 0;
        for day in first.iter_days().take_while(|d| *d <= last) {
            let census = daily_census(episodes, day);
            rate_sum += census as f64 / beds;
            peak_census = peak_census.max(census);
            days += 1;
        }

        if days == 0 {
            continue;
        }
        summary.months.push(MonthlyOccupancy {
            year: month.year,
            month: month.month,
            days,
            average_pct: rate_sum / f64::from(days) * 100.0,
            peak_census,
        });
    }

    if !summary.months.is_empty() {
        summary.average_pct = summary.months.iter().map(|m| m.average_pct).sum::<f64>()
            / summary.months.len() as f64;
    }

    log::debug!(
        "Occupancy {} to {} over {} months at {} beds: {:.2}%",
        period_start,
        period_end,
        summary.months.len(),
        capacity,
        summary.average_pct
    );

    summary
}

/// Mean of monthly average occupancy, as an unrounded percentage
#[must_use]
pub fn average_occupancy(
    episodes: &[Episode],
    capacity: u32,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> f64 {
    occupancy_summary(episodes, capacity, period_start, period_end).average_pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HospitalSite, PatientKey};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card_stay(index: usize, card: &str, admission: NaiveDate) -> Episode {
        Episode::new(index, PatientKey::HealthCard(card.into()), HospitalSite::B)
            .with_admission(admission)
    }

    #[test]
    fn test_single_open_patient_thirty_day_month() {
        let episodes = vec![card_stay(0, "1", date(2024, 4, 1))];
        let summary = occupancy_summary(&episodes, 10, date(2024, 4, 1), date(2024, 4, 30));

        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].days, 30);
        assert!((summary.average_pct - 10.0).abs() < 1e-9);
        assert_eq!(summary.rounded_pct(), 10.0);
    }

    #[test]
    fn test_card_holder_counted_once_per_day() {
        let episodes = vec![
            card_stay(0, "1", date(2024, 4, 1)),
            card_stay(1, "1", date(2024, 4, 1)).with_discharge(date(2024, 4, 30)),
        ];
        assert_eq!(daily_census(&episodes, date(2024, 4, 10)), 1);
    }

    #[test]
    fn test_unidentified_counted_per_record() {
        let episodes = vec![
            Episode::new(0, PatientKey::NameOnly("Maria".into()), HospitalSite::B)
                .with_admission(date(2024, 4, 1)),
            Episode::new(1, PatientKey::NameOnly("Maria".into()), HospitalSite::B)
                .with_admission(date(2024, 4, 1)),
            Episode::new(2, PatientKey::Anonymous, HospitalSite::B)
                .with_admission(date(2024, 4, 1)),
        ];
        assert_eq!(daily_census(&episodes, date(2024, 4, 10)), 3);
    }

    #[test]
    fn test_month_of_months_average() {
        // February 2023 (28 days) fully occupied, March 2023 (31 days) empty
        let episodes = vec![
            card_stay(0, "1", date(2023, 2, 1)).with_discharge(date(2023, 2, 28)),
        ];
        let summary = occupancy_summary(&episodes, 1, date(2023, 2, 1), date(2023, 3, 31));

        assert_eq!(summary.months.len(), 2);
        assert!((summary.months[0].average_pct - 100.0).abs() < 1e-9);
        assert_eq!(summary.months[1].average_pct, 0.0);
        // A flat daily average would give 28/59
        assert!((summary.average_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_starting_mid_month_counts_whole_month() {
        // Admitted on the 16th: 15 of April's 30 days at 1 of 2 beds
        let episodes = vec![card_stay(0, "1", date(2024, 4, 16))];
        let summary = occupancy_summary(&episodes, 2, date(2024, 4, 16), date(2024, 4, 30));

        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].days, 30);
        assert!((summary.average_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_guards_return_zero() {
        let episodes = vec![card_stay(0, "1", date(2024, 4, 1))];
        assert_eq!(average_occupancy(&episodes, 0, date(2024, 4, 1), date(2024, 4, 30)), 0.0);
        assert_eq!(average_occupancy(&[], 10, date(2024, 4, 1), date(2024, 4, 30)), 0.0);
        assert_eq!(average_occupancy(&episodes, 10, date(2024, 5, 1), date(2024, 4, 30)), 0.0);
    }

    #[test]
    fn test_reporting_window() {
        let episodes = vec![
            card_stay(0, "1", date(2023, 6, 15)),
            Episode::new(1, PatientKey::Anonymous, HospitalSite::B),
        ];

        let window = reporting_window(&episodes, date(2024, 1, 1), date(2024, 5, 20)).unwrap();
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 4, 30));

        let window = reporting_window(&episodes, date(2020, 1, 1), date(2024, 5, 20)).unwrap();
        assert_eq!(window.start, date(2023, 6, 15));

        assert!(reporting_window(&episodes, date(2024, 5, 1), date(2024, 5, 20)).is_none());
        assert!(reporting_window(&[], date(2024, 1, 1), date(2024, 5, 20)).is_none());
    }

    #[test]
    fn test_monthly_points() {
        let episodes = vec![card_stay(0, "1", date(2024, 4, 1))];
        let summary = occupancy_summary(&episodes, 3, date(2024, 4, 1), date(2024, 5, 31));
        let points = summary.monthly_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "2024-04");
        assert_eq!(points[0].value, 33.3);
    }
}
