//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use rand::Rng;
use rand::rngs::StdRng;
use ward_metrics::RawEpisode;
use ward_metrics::models::RawWeekday;

/// Build a date, panicking on an impossible one
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// A discharged episode for a card holder
#[must_use]
pub fn stay(card: &str, admission: &str, discharge: &str) -> RawEpisode {
    RawEpisode::new(&format!("Patient {card}"), admission)
        .with_cns(card)
        .with_discharge(discharge)
}

/// A still-admitted episode for a card holder
#[must_use]
pub fn open_stay(card: &str, admission: &str) -> RawEpisode {
    RawEpisode::new(&format!("Patient {card}"), admission).with_cns(card)
}

/// Random dataset with a few patients, some open stays, some records
/// without a card and the odd malformed date
pub fn random_records(rng: &mut StdRng, count: usize) -> Vec<RawEpisode> {
    let base = date(2024, 1, 1);
    (0..count)
        .map(|_| {
            let admission = base + chrono::Duration::days(rng.random_range(0..180));
            let mut record = RawEpisode::new("Random", &admission.to_string());

            if rng.random_bool(0.85) {
                record = record.with_cns(&rng.random_range(1..15).to_string());
            }
            match rng.random_range(0..10) {
                0 => {}
                1 => record = record.with_discharge("not-a-date"),
                2 => {
                    let before = admission - chrono::Duration::days(rng.random_range(1..5));
                    record = record.with_discharge(&before.to_string());
                }
                _ => {
                    let discharge = admission + chrono::Duration::days(rng.random_range(0..40));
                    record = record.with_discharge(&discharge.to_string());
                }
            }
            if rng.random_bool(0.2) {
                record = record.with_length_of_stay(f64::from(rng.random_range(0..30)));
            }
            if rng.random_bool(0.1) {
                record = record.with_discharge_weekday(RawWeekday::Number(rng.random_range(0..9)));
            }
            record
        })
        .collect()
}
