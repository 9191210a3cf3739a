//! Average length of stay

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Episode;
use crate::utils::calendar::days_between;

/// How still-admitted patients enter the average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OngoingStayPolicy {
    /// Leave open episodes out of the average
    Exclude,
    /// Count the days elapsed from admission up to the given date
    ElapsedUntil(NaiveDate),
}

/// Average length of stay with the counts behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthOfStaySummary {
    pub average_days: f64,
    pub total_days: f64,
    /// Episodes that contributed to the average
    pub included: usize,
    /// Open episodes included as elapsed days
    pub ongoing_included: usize,
    /// Open episodes left out by policy
    pub ongoing_excluded: usize,
    /// Episodes left out for an unknown admission date or inverted interval
    pub invalid: usize,
}

/// Stay of one episode in days, or `None` when it does not count
#[must_use]
pub fn stay_days(episode: &Episode, policy: OngoingStayPolicy) -> Option<f64> {
    let admission = episode.admission_date?;

    if let Some(days) = episode.length_of_stay_days {
        return Some(days);
    }

    match (episode.discharge_date, policy) {
        (Some(discharge), _) => {
            let days = days_between(admission, discharge);
            (days >= 0).then_some(days as f64)
        }
        (None, OngoingStayPolicy::Exclude) => None,
        (None, OngoingStayPolicy::ElapsedUntil(as_of)) => {
            Some(days_between(admission, as_of).max(0) as f64)
        }
    }
}

/// Average length of stay and the episode counts behind it
#[must_use]
pub fn length_of_stay_summary(episodes: &[Episode], policy: OngoingStayPolicy) -> LengthOfStaySummary {
    let mut summary = LengthOfStaySummary {
        average_days: 0.0,
        total_days: 0.0,
        included: 0,
        ongoing_included: 0,
        ongoing_excluded: 0,
        invalid: 0,
    };

    for episode in episodes {
        match stay_days(episode, policy) {
            Some(days) => {
                summary.total_days += days;
                summary.included += 1;
                if episode.is_open() && episode.length_of_stay_days.is_none() {
                    summary.ongoing_included += 1;
                }
            }
            None if episode.is_open() => summary.ongoing_excluded += 1,
            None => summary.invalid += 1,
        }
    }

    if summary.included > 0 {
        summary.average_days = summary.total_days / summary.included as f64;
    }

    summary
}

/// Mean stay in days over the included episodes; 0 when none qualify
#[must_use]
pub fn average_stay(episodes: &[Episode], policy: OngoingStayPolicy) -> f64 {
    length_of_stay_summary(episodes, policy).average_days
}
