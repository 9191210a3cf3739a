//! Shared helpers: calendar arithmetic, presentation formatting and logging

pub mod calendar;
pub mod format;
pub mod logging;

pub use calendar::{YearMonth, days_between, end_of_previous_month, months_between};
pub use format::{DecimalSeparator, format_decimal, format_percentage, round_one_decimal};
