//! Discharges per day of the week

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{CountedPoint, Episode};
use crate::utils::calendar::weekday_label;
use crate::utils::format::{percentage, round_one_decimal};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Discharge counts indexed Monday first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekdayDistribution {
    pub total: usize,
    pub counts: [usize; 7],
}

impl WeekdayDistribution {
    fn record(&mut self, weekday: Weekday) {
        self.counts[weekday.num_days_from_monday() as usize] += 1;
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, weekday: Weekday) -> usize {
        self.counts[weekday.num_days_from_monday() as usize]
    }

    /// Share of discharges on `weekday`; 0 when nothing was counted
    #[must_use]
    pub fn percentage(&self, weekday: Weekday) -> f64 {
        percentage(self.count(weekday), self.total)
    }

    /// Monday..Sunday chart points with one-decimal percentages
    #[must_use]
    pub fn to_chart_points(&self) -> Vec<CountedPoint> {
        WEEK.iter()
            .map(|&day| {
                CountedPoint::new(
                    weekday_label(day),
                    round_one_decimal(self.percentage(day)),
                    self.count(day),
                )
            })
            .collect()
    }
}

/// Count every episode with a known discharge weekday
#[must_use]
pub fn weekday_distribution(episodes: &[Episode]) -> WeekdayDistribution {
    let mut distribution = WeekdayDistribution::default();
    for weekday in episodes.iter().filter_map(|e| e.discharge_weekday) {
        distribution.record(weekday);
    }
    distribution
}

/// Like [`weekday_distribution`], limited to discharges dated in `[start, end]`
#[must_use]
pub fn weekday_distribution_between(
    episodes: &[Episode],
    start: NaiveDate,
    end: NaiveDate,
) -> WeekdayDistribution {
    let mut distribution = WeekdayDistribution::default();
    for episode in episodes {
        let in_range = episode
            .discharge_date
            .is_some_and(|d| d >= start && d <= end);
        if let (true, Some(weekday)) = (in_range, episode.discharge_weekday) {
            distribution.record(weekday);
        }
    }
    distribution
}
