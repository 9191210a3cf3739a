//! Aggregate value objects handed to chart and export collaborators

use serde::{Deserialize, Serialize};

use crate::utils::format::{DecimalSeparator, format_decimal, format_percentage};

/// `{ name, value }` tuple for charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl ChartPoint {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// `{ name, value, count }` tuple for charts that show raw counts too
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountedPoint {
    pub name: String,
    pub value: f64,
    pub count: usize,
}

impl CountedPoint {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64, count: usize) -> Self {
        Self {
            name: name.into(),
            value,
            count,
        }
    }
}

/// Headline indicators for one reporting request
///
/// Values are unrounded; use [`AggregateResult::formatted`] for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub average_stay_days: f64,
    pub readmission_rate_7: f64,
    pub readmission_rate_15: f64,
    pub readmission_rate_30: f64,
    pub occupancy_rate_pct: f64,
    /// Percentage per weekday, Monday first
    pub weekday_distribution: Vec<CountedPoint>,
}

/// Display strings for an [`AggregateResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAggregate {
    pub average_stay_days: String,
    pub readmission_rate_7: String,
    pub readmission_rate_15: String,
    pub readmission_rate_30: String,
    pub occupancy_rate_pct: String,
}

impl AggregateResult {
    /// Format every scalar with one decimal and the given separator
    #[must_use]
    pub fn formatted(&self, separator: DecimalSeparator) -> FormattedAggregate {
        FormattedAggregate {
            average_stay_days: format_decimal(self.average_stay_days, 1, separator),
            readmission_rate_7: format_percentage(self.readmission_rate_7, separator),
            readmission_rate_15: format_percentage(self.readmission_rate_15, separator),
            readmission_rate_30: format_percentage(self.readmission_rate_30, separator),
            occupancy_rate_pct: format_percentage(self.occupancy_rate_pct, separator),
        }
    }
}
