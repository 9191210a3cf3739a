//! Calendar helpers for reporting periods
//!
//! Everything here works on `NaiveDate`, i.e. plain calendar dates with no
//! timezone attached. Day differences are therefore exact whole days.

use chrono::{Datelike, NaiveDate, Weekday};

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month (inclusive)
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    #[must_use]
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// `YYYY-MM`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Every month touched by the inclusive range `[start, end]`, oldest first.
///
/// Returns an empty list when `start > end`.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<YearMonth> {
    let mut months = Vec::new();
    if start > end {
        return months;
    }

    let last = YearMonth::of(end);
    let mut current = YearMonth::of(start);
    while current <= last {
        months.push(current);
        current = current.next();
    }
    months
}

/// Last day of the month before the month containing `today`.
///
/// Reports stop there so the still-accruing current month never shows up.
#[must_use]
pub fn end_of_previous_month(today: NaiveDate) -> NaiveDate {
    YearMonth::of(today).previous().last_day()
}

/// Whole days from `from` to `to` (negative when `to` is earlier)
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Map the 1..7 convention (1 = Monday) to a weekday
#[must_use]
pub fn weekday_from_number(number: i64) -> Option<Weekday> {
    match number {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a weekday name in Portuguese or English.
///
/// Accepts full names with or without `-feira`, three letter
/// abbreviations, any case, and `terça` / `sábado` with or without accents.
#[must_use]
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let normalized = name
        .trim()
        .to_lowercase()
        .replace('ç', "c")
        .replace('á', "a");
    let stem = normalized
        .strip_suffix("-feira")
        .or_else(|| normalized.strip_suffix(" feira"))
        .unwrap_or(&normalized);

    match stem {
        "segunda" | "seg" | "monday" | "mon" => Some(Weekday::Mon),
        "terca" | "ter" | "tuesday" | "tue" => Some(Weekday::Tue),
        "quarta" | "qua" | "wednesday" | "wed" => Some(Weekday::Wed),
        "quinta" | "qui" | "thursday" | "thu" => Some(Weekday::Thu),
        "sexta" | "sex" | "friday" | "fri" => Some(Weekday::Fri),
        "sabado" | "sab" | "saturday" | "sat" => Some(Weekday::Sat),
        "domingo" | "dom" | "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Display name used in chart output
#[must_use]
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
