//! Presentation formatting for computed aggregates
//!
//! The algorithms return plain `f64` values. Rounding for reports and the
//! decimal separator convention are applied here, once, when results leave
//! the core.

use serde::{Deserialize, Serialize};

/// Decimal separator used in formatted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `12,5` (pt-BR and most of Europe)
    #[default]
    Comma,
    /// `12.5`
    Dot,
}

/// Round half away from zero to `places` decimals
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round to the single decimal used by institutional reports
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    round_to(value, 1)
}

/// Format `value` with a fixed number of decimals and the given separator
#[must_use]
pub fn format_decimal(value: f64, places: u32, separator: DecimalSeparator) -> String {
    let formatted = format!("{:.*}", places as usize, round_to(value, places));
    match separator {
        DecimalSeparator::Dot => formatted,
        DecimalSeparator::Comma => formatted.replace('.', ","),
    }
}

/// Format a percentage with one decimal and a trailing `%`
#[must_use]
pub fn format_percentage(value: f64, separator: DecimalSeparator) -> String {
    format!("{}%", format_decimal(value, 1, separator))
}

/// Share of `count` in `total` as a percentage, 0 when `total` is 0
#[must_use]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_one_decimal(10.04), 10.0);
        assert_eq!(round_one_decimal(10.06), 10.1);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(f64::NAN, 1), 0.0);
    }

    #[test]
    fn test_format_decimal_separators() {
        assert_eq!(format_decimal(15.0, 1, DecimalSeparator::Comma), "15,0");
        assert_eq!(format_decimal(15.0, 1, DecimalSeparator::Dot), "15.0");
        assert_eq!(format_decimal(3.14159, 2, DecimalSeparator::Comma), "3,14");
        assert_eq!(format_percentage(66.666, DecimalSeparator::Dot), "66.7%");
    }

    #[test]
    fn test_percentage_guards_zero_total() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
