//! Record normalization
//!
//! Turns raw upstream rows into [`Episode`]s. Dates are built directly from
//! their year, month and day fields and never pass through a timestamp, so a
//! date cannot shift by a day depending on the local timezone.
//!
//! A bad field never drops the record: the episode is kept with that field
//! unset, which excludes it only from the calculations that need the field.

use chrono::{Datelike, NaiveDate};
use log::{debug, warn};
use serde::Serialize;

use crate::models::{Episode, HospitalSite, PatientKey, RawEpisode, RawWeekday};
use crate::utils::calendar::{weekday_from_name, weekday_from_number};

/// Parse a `YYYY-MM-DD` value into a calendar date.
///
/// Anything after the date part (`T10:00:00Z`, ` 08:30`) is ignored, so the
/// literal calendar fields win over any timezone information.
#[must_use]
pub fn parse_local_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    let date_part = value.split(['T', ' ']).next().unwrap_or(value);
    let mut fields = date_part.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return None;
    };

    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    let day = day.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Counts of anomalies found while normalizing and analysing a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataQualityReport {
    pub total_records: usize,
    /// Admission date missing or unparseable
    pub malformed_admission_dates: usize,
    /// Discharge date present but unparseable
    pub malformed_discharge_dates: usize,
    pub discharge_before_admission: usize,
    /// Episodes without a health-card number
    pub unidentified_episodes: usize,
    /// Discharge weekday unparseable, or given for a patient never discharged
    pub invalid_weekdays: usize,
    /// Supplied length of stay negative or not a number
    pub invalid_lengths_of_stay: usize,
    /// Consecutive episodes of one patient whose stays overlap; known only
    /// once series are built, so filled in by the report builder
    pub overlapping_episodes: usize,
}

impl DataQualityReport {
    /// Total number of anomalies
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.malformed_admission_dates
            + self.malformed_discharge_dates
            + self.discharge_before_admission
            + self.invalid_weekdays
            + self.invalid_lengths_of_stay
            + self.overlapping_episodes
    }

    fn merge(&mut self, other: &Self) {
        self.total_records += other.total_records;
        self.malformed_admission_dates += other.malformed_admission_dates;
        self.malformed_discharge_dates += other.malformed_discharge_dates;
        self.discharge_before_admission += other.discharge_before_admission;
        self.unidentified_episodes += other.unidentified_episodes;
        self.invalid_weekdays += other.invalid_weekdays;
        self.invalid_lengths_of_stay += other.invalid_lengths_of_stay;
        self.overlapping_episodes += other.overlapping_episodes;
    }
}

/// Output of [`normalize_records`]
#[derive(Debug, Clone, Default)]
pub struct NormalizedEpisodes {
    pub episodes: Vec<Episode>,
    pub quality: DataQualityReport,
}

/// Normalize one raw record
///
/// Returns the episode together with a per-record quality tally.
#[must_use]
pub fn normalize_record(
    record_index: usize,
    raw: &RawEpisode,
    site: HospitalSite,
) -> (Episode, DataQualityReport) {
    let mut quality = DataQualityReport {
        total_records: 1,
        ..DataQualityReport::default()
    };

    let patient_key = PatientKey::from_fields(raw.cns.as_deref(), raw.nome.as_deref());
    if !patient_key.is_identified() {
        quality.unidentified_episodes += 1;
    }

    let admission_date = parse_local_date(raw.data_admissao.as_deref());
    if admission_date.is_none() {
        debug!(
            "Record {record_index}: admission date {:?} is missing or malformed",
            raw.data_admissao
        );
        quality.malformed_admission_dates += 1;
    }

    let discharge_date = parse_local_date(raw.data_alta.as_deref());
    let discharge_supplied = raw.data_alta.as_deref().is_some_and(|d| !d.trim().is_empty());
    if discharge_supplied && discharge_date.is_none() {
        debug!(
            "Record {record_index}: discharge date {:?} is malformed",
            raw.data_alta
        );
        quality.malformed_discharge_dates += 1;
    }

    if let (Some(admission), Some(discharge)) = (admission_date, discharge_date) {
        if discharge < admission {
            debug!("Record {record_index}: discharged {discharge} before admission {admission}");
            quality.discharge_before_admission += 1;
        }
    }

    let length_of_stay_days = match raw.dias_internacao {
        Some(days) if days.is_finite() && days >= 0.0 => Some(days),
        Some(days) => {
            debug!("Record {record_index}: invalid length of stay {days}");
            quality.invalid_lengths_of_stay += 1;
            None
        }
        None => None,
    };

    let discharge_weekday = match &raw.dia_semana_alta {
        // Still admitted: a weekday without a discharge is not a discharge
        Some(field) if !discharge_supplied => {
            debug!("Record {record_index}: discharge weekday {field:?} without a discharge date");
            quality.invalid_weekdays += 1;
            None
        }
        Some(field) => {
            let parsed = match field {
                RawWeekday::Number(n) => weekday_from_number(*n),
                RawWeekday::Name(name) => weekday_from_name(name),
            };
            if parsed.is_none() {
                debug!("Record {record_index}: invalid discharge weekday {field:?}");
                quality.invalid_weekdays += 1;
            }
            parsed
        }
        None => discharge_date.map(|d| d.weekday()),
    };

    let episode = Episode {
        record_index,
        patient_key,
        patient_name: raw
            .nome
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        admission_date,
        discharge_date,
        length_of_stay_days,
        hospital_site: site,
        discharge_weekday,
    };

    (episode, quality)
}

/// Normalize every record of a dataset for one site
///
/// Output order matches input order; `record_index` is the input position.
#[must_use]
pub fn normalize_records(records: &[RawEpisode], site: HospitalSite) -> NormalizedEpisodes {
    let mut normalized = NormalizedEpisodes {
        episodes: Vec::with_capacity(records.len()),
        quality: DataQualityReport::default(),
    };

    for (index, raw) in records.iter().enumerate() {
        let (episode, quality) = normalize_record(index, raw, site);
        normalized.episodes.push(episode);
        normalized.quality.merge(&quality);
    }

    let quality = &normalized.quality;
    if quality.issue_count() > 0 {
        warn!(
            "Normalized {} records for site {site} with {} data quality issues \
             (admission: {}, discharge: {}, inverted: {}, weekday: {}, length of stay: {})",
            quality.total_records,
            quality.issue_count(),
            quality.malformed_admission_dates,
            quality.malformed_discharge_dates,
            quality.discharge_before_admission,
            quality.invalid_weekdays,
            quality.invalid_lengths_of_stay
        );
    } else {
        debug!(
            "Normalized {} records for site {site} without issues",
            quality.total_records
        );
    }

    normalized
}
