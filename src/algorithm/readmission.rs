//! Readmission classification
//!
//! For every identified patient series, each discharge that is followed by
//! another admission is an *eligible discharge*. The gap between that
//! discharge and the next admission is classified against nested day
//! windows (7, 15 and 30 days by default). All windows share one
//! denominator, so `rate(7) <= rate(15) <= rate(30)` always holds.
//!
//! Unidentified series are skipped entirely. Pairs with a negative gap or an
//! inverted first episode are bad data: they are counted and excluded, never
//! clamped.

use serde::Serialize;
use smallvec::SmallVec;

use crate::algorithm::grouping::PatientGroups;
use crate::error::{AnalyticsError, Result};
use crate::models::{CountedPoint, Episode};
use crate::utils::calendar::days_between;
use crate::utils::format::percentage;

/// Sorted, deduplicated readmission windows in days
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmissionWindows(SmallVec<[u32; 4]>);

impl ReadmissionWindows {
    /// Build from any list of windows; an empty list is rejected
    pub fn new(windows: &[u32]) -> Result<Self> {
        let mut sorted: SmallVec<[u32; 4]> = windows.iter().copied().collect();
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.is_empty() {
            return Err(AnalyticsError::InvalidConfig(
                "at least one readmission window is required".into(),
            ));
        }
        Ok(Self(sorted))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Longest window; gaps above it land in the "beyond" bucket
    #[must_use]
    pub fn longest(&self) -> u32 {
        self.0.last().copied().unwrap_or_default()
    }
}

impl Default for ReadmissionWindows {
    fn default() -> Self {
        Self(SmallVec::from_slice(&crate::config::DEFAULT_READMISSION_WINDOWS))
    }
}

/// Readmission count for one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowRate {
    pub window_days: u32,
    pub readmissions: usize,
    /// Percentage of eligible discharges
    pub rate: f64,
}

/// Result of [`classify_readmissions`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadmissionSummary {
    /// Discharges followed by a later admission of the same patient
    pub eligible_discharges: usize,
    /// One entry per configured window, shortest first
    pub windows: Vec<WindowRate>,
    /// Gaps longer than the longest window
    pub beyond_longest_window: usize,
    /// Every valid gap in days, in series then chronological order
    #[serde(skip)]
    pub gaps: Vec<i64>,
    /// Identified series walked
    pub series_analysed: usize,
    /// Series skipped for an unknown identity
    pub unidentified_series_skipped: usize,
    /// Pairs whose next admission predates the discharge
    pub overlapping_pairs: usize,
    /// Pairs whose first episode was discharged before it was admitted
    pub inconsistent_pairs: usize,
    /// Pairs whose first episode has no discharge yet a later admission exists
    pub open_followed_by_admission: usize,
}

impl ReadmissionSummary {
    fn empty(windows: &ReadmissionWindows) -> Self {
        Self {
            eligible_discharges: 0,
            windows: windows
                .as_slice()
                .iter()
                .map(|&window_days| WindowRate {
                    window_days,
                    readmissions: 0,
                    rate: 0.0,
                })
                .collect(),
            beyond_longest_window: 0,
            gaps: Vec::new(),
            series_analysed: 0,
            unidentified_series_skipped: 0,
            overlapping_pairs: 0,
            inconsistent_pairs: 0,
            open_followed_by_admission: 0,
        }
    }

    /// Readmission rate for `window_days`, 0 when that window was not configured
    #[must_use]
    pub fn rate(&self, window_days: u32) -> f64 {
        self.windows
            .iter()
            .find(|w| w.window_days == window_days)
            .map_or(0.0, |w| w.rate)
    }

    /// Share of eligible discharges readmitted after the longest window
    #[must_use]
    pub fn beyond_rate(&self) -> f64 {
        percentage(self.beyond_longest_window, self.eligible_discharges)
    }

    /// Pairs excluded as bad data
    #[must_use]
    pub fn excluded_pairs(&self) -> usize {
        self.overlapping_pairs + self.inconsistent_pairs + self.open_followed_by_admission
    }

    /// Gap bands between consecutive windows, e.g. `0-7 days`, `8-15 days`,
    /// `16-30 days`, `>30 days`, as percentages of eligible discharges
    #[must_use]
    pub fn gap_distribution(&self) -> Vec<CountedPoint> {
        let mut points = Vec::with_capacity(self.windows.len() + 1);
        let mut lower = 0u32;
        let mut previous_count = 0usize;

        for window in &self.windows {
            let count = window.readmissions - previous_count;
            points.push(CountedPoint::new(
                format!("{lower}-{} days", window.window_days),
                percentage(count, self.eligible_discharges),
                count,
            ));
            lower = window.window_days + 1;
            previous_count = window.readmissions;
        }

        let longest = self.windows.last().map_or(0, |w| w.window_days);
        points.push(CountedPoint::new(
            format!(">{longest} days"),
            self.beyond_rate(),
            self.beyond_longest_window,
        ));
        points
    }
}

enum PairOutcome {
    Gap(i64),
    Overlapping,
    Inconsistent,
    OpenFollowed,
}

fn classify_pair(current: &Episode, next: &Episode) -> PairOutcome {
    let Some(discharge) = current.discharge_date else {
        return PairOutcome::OpenFollowed;
    };
    if current.has_inverted_interval() {
        return PairOutcome::Inconsistent;
    }
    // Series only hold dated episodes
    let Some(next_admission) = next.admission_date else {
        return PairOutcome::Inconsistent;
    };

    let gap = days_between(discharge, next_admission);
    if gap < 0 {
        PairOutcome::Overlapping
    } else {
        PairOutcome::Gap(gap)
    }
}

/// Classify readmission gaps over the identified series in `groups`
///
/// # Arguments
/// * `groups` - Episodes grouped per patient; unidentified series are skipped
/// * `windows` - Readmission windows in days, ascending
///
/// # Returns
/// A `ReadmissionSummary` with one rate per window and the excluded pair counts
#[must_use]
pub fn classify_readmissions(
    groups: &PatientGroups<'_>,
    windows: &ReadmissionWindows,
) -> ReadmissionSummary {
    let mut summary = ReadmissionSummary::empty(windows);
    let mut readmissions: SmallVec<[usize; 4]> = SmallVec::from_elem(0, windows.as_slice().len());
    let longest = i64::from(windows.longest());

    for series in groups.all() {
        if !series.is_identified() {
            summary.unidentified_series_skipped += 1;
            continue;
        }
        summary.series_analysed += 1;

        for (current, next) in series.consecutive_pairs() {
            match classify_pair(current, next) {
                PairOutcome::Gap(gap) => {
                    summary.eligible_discharges += 1;
                    summary.gaps.push(gap);
                    for (slot, &window) in windows.as_slice().iter().enumerate() {
                        if gap <= i64::from(window) {
                            readmissions[slot] += 1;
                        }
                    }
                    if gap > longest {
                        summary.beyond_longest_window += 1;
                    }
                }
                PairOutcome::Overlapping => summary.overlapping_pairs += 1,
                PairOutcome::Inconsistent => summary.inconsistent_pairs += 1,
                PairOutcome::OpenFollowed => summary.open_followed_by_admission += 1,
            }
        }
    }

    for (window, count) in summary.windows.iter_mut().zip(readmissions) {
        window.readmissions = count;
        window.rate = percentage(count, summary.eligible_discharges);
    }

    if summary.excluded_pairs() > 0 {
        log::warn!(
            "Excluded {} episode pairs from readmission analysis \
             (overlapping: {}, inconsistent: {}, open: {})",
            summary.excluded_pairs(),
            summary.overlapping_pairs,
            summary.inconsistent_pairs,
            summary.open_followed_by_admission
        );
    }
    log::debug!(
        "Readmission: {} eligible discharges across {} series ({} unidentified skipped)",
        summary.eligible_discharges,
        summary.series_analysed,
        summary.unidentified_series_skipped
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::grouping::group_by_patient;
    use crate::models::{HospitalSite, PatientKey};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(index: usize, card: &str, admission: NaiveDate, discharge: Option<NaiveDate>) -> Episode {
        let episode = Episode::new(index, PatientKey::HealthCard(card.into()), HospitalSite::A)
            .with_admission(admission);
        match discharge {
            Some(d) => episode.with_discharge(d),
            None => episode,
        }
    }

    fn classify(episodes: &[Episode]) -> ReadmissionSummary {
        classify_readmissions(&group_by_patient(episodes), &ReadmissionWindows::default())
    }

    #[test]
    fn test_windows_sorted_and_deduplicated() {
        let windows = ReadmissionWindows::new(&[30, 7, 15, 7]).unwrap();
        assert_eq!(windows.as_slice(), &[7, 15, 30]);
        assert_eq!(windows.longest(), 30);
        assert!(ReadmissionWindows::new(&[]).is_err());
    }

    #[test]
    fn test_nine_day_gap() {
        let episodes = vec![
            stay(0, "1", date(2023, 12, 20), Some(date(2024, 1, 1))),
            stay(1, "1", date(2024, 1, 10), Some(date(2024, 1, 12))),
        ];

        let summary = classify(&episodes);
        assert_eq!(summary.eligible_discharges, 1);
        assert_eq!(summary.rate(7), 0.0);
        assert_eq!(summary.rate(15), 100.0);
        assert_eq!(summary.rate(30), 100.0);
        assert_eq!(summary.beyond_longest_window, 0);
        assert_eq!(summary.gaps, vec![9]);
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let episodes = vec![
            stay(0, "1", date(2024, 1, 1), Some(date(2024, 1, 2))),
            stay(1, "1", date(2024, 1, 9), Some(date(2024, 1, 10))), // gap 7
            stay(2, "1", date(2024, 2, 9), Some(date(2024, 2, 10))), // gap 30
            stay(3, "1", date(2024, 3, 12), None),                   // gap 31
        ];

        let summary = classify(&episodes);
        assert_eq!(summary.eligible_discharges, 3);
        assert_eq!(summary.windows[0].readmissions, 1);
        assert_eq!(summary.windows[1].readmissions, 1);
        assert_eq!(summary.windows[2].readmissions, 2);
        assert_eq!(summary.beyond_longest_window, 1);
    }

    #[test]
    fn test_overlapping_pair_excluded() {
        let episodes = vec![
            stay(0, "1", date(2024, 1, 1), Some(date(2024, 1, 20))),
            stay(1, "1", date(2024, 1, 15), Some(date(2024, 1, 25))),
        ];

        let summary = classify(&episodes);
        assert_eq!(summary.eligible_discharges, 0);
        assert_eq!(summary.overlapping_pairs, 1);
        assert!(summary.windows.iter().all(|w| w.readmissions == 0 && w.rate == 0.0));
    }

    #[test]
    fn test_inverted_and_open_pairs_excluded() {
        let episodes = vec![
            stay(0, "1", date(2024, 1, 10), Some(date(2024, 1, 5))),
            stay(1, "1", date(2024, 1, 12), None),
            stay(2, "1", date(2024, 2, 1), Some(date(2024, 2, 3))),
        ];

        let summary = classify(&episodes);
        assert_eq!(summary.eligible_discharges, 0);
        assert_eq!(summary.inconsistent_pairs, 1);
        assert_eq!(summary.open_followed_by_admission, 1);
        assert_eq!(summary.excluded_pairs(), 2);
    }

    #[test]
    fn test_unidentified_series_skipped() {
        let episodes = vec![
            Episode::new(0, PatientKey::NameOnly("Maria".into()), HospitalSite::A)
                .with_admission(date(2024, 1, 1))
                .with_discharge(date(2024, 1, 2)),
            Episode::new(1, PatientKey::NameOnly("Maria".into()), HospitalSite::A)
                .with_admission(date(2024, 1, 4)),
        ];

        let summary = classify(&episodes);
        assert_eq!(summary.eligible_discharges, 0);
        assert_eq!(summary.unidentified_series_skipped, 1);
        assert_eq!(summary.series_analysed, 0);
    }

    #[test]
    fn test_last_discharge_not_eligible() {
        let episodes = vec![
            stay(0, "1", date(2024, 1, 1), Some(date(2024, 1, 2))),
            stay(1, "1", date(2024, 1, 5), Some(date(2024, 1, 6))),
            stay(2, "2", date(2024, 1, 1), Some(date(2024, 1, 2))),
        ];

        let summary = classify(&episodes);
        assert_eq!(summary.eligible_discharges, 1);
        assert_eq!(summary.rate(7), 100.0);
    }

    #[test]
    fn test_gap_distribution_bands() {
        let episodes = vec![
            stay(0, "1", date(2024, 1, 1), Some(date(2024, 1, 2))),
            stay(1, "1", date(2024, 1, 4), Some(date(2024, 1, 5))),  // gap 2
            stay(2, "1", date(2024, 1, 17), Some(date(2024, 1, 18))), // gap 12
            stay(3, "1", date(2024, 3, 1), None),                    // gap 43
        ];

        let bands = classify(&episodes).gap_distribution();
        let names: Vec<&str> = bands.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["0-7 days", "8-15 days", "16-30 days", ">30 days"]);
        let counts: Vec<usize> = bands.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 1]);
        let total: f64 = bands.iter().map(|p| p.value).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unconfigured_window_rate_is_zero() {
        let summary = classify(&[]);
        assert_eq!(summary.rate(60), 0.0);
        assert_eq!(summary.rate(7), 0.0);
        assert_eq!(summary.beyond_rate(), 0.0);
    }
}
