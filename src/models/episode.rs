//! Normalized hospitalization episode model

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Hospital site an episode belongs to
///
/// Selects the bed capacity and reporting floor date from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HospitalSite {
    A,
    B,
}

impl fmt::Display for HospitalSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

impl FromStr for HospitalSite {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            other => Err(AnalyticsError::InvalidConfig(format!(
                "unknown hospital site '{other}'"
            ))),
        }
    }
}

/// Identity of the patient behind an episode
///
/// Only `HealthCard` is a real identity. `NameOnly` and `Anonymous` mark an
/// unknown identity and are never merged with a card holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientKey {
    /// Trimmed national health-card number
    HealthCard(String),
    /// No card number; trimmed patient name kept for grouping
    NameOnly(String),
    /// Neither card number nor name
    Anonymous,
}

impl PatientKey {
    /// Build the canonical key from the raw card number and name
    #[must_use]
    pub fn from_fields(cns: Option<&str>, name: Option<&str>) -> Self {
        let card = cns.map(str::trim).filter(|c| !c.is_empty());
        if let Some(card) = card {
            return Self::HealthCard(card.to_string());
        }

        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Self::NameOnly(name.to_string()),
            None => Self::Anonymous,
        }
    }

    #[must_use]
    pub fn is_identified(&self) -> bool {
        matches!(self, Self::HealthCard(_))
    }

    #[must_use]
    pub fn health_card(&self) -> Option<&str> {
        match self {
            Self::HealthCard(card) => Some(card),
            _ => None,
        }
    }
}

/// One hospitalization, admission through discharge or still ongoing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    /// Position of the source record in the input
    pub record_index: usize,
    pub patient_key: PatientKey,
    pub patient_name: Option<String>,
    /// `None` only when the source value was missing or malformed
    pub admission_date: Option<NaiveDate>,
    /// `None` while the patient is still admitted (or the value was malformed)
    pub discharge_date: Option<NaiveDate>,
    /// Supplied length of stay in days
    pub length_of_stay_days: Option<f64>,
    pub hospital_site: HospitalSite,
    pub discharge_weekday: Option<Weekday>,
}

impl Episode {
    /// Create an episode with no dates set
    #[must_use]
    pub fn new(record_index: usize, patient_key: PatientKey, hospital_site: HospitalSite) -> Self {
        Self {
            record_index,
            patient_key,
            patient_name: None,
            admission_date: None,
            discharge_date: None,
            length_of_stay_days: None,
            hospital_site,
            discharge_weekday: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.patient_name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_admission(mut self, date: NaiveDate) -> Self {
        self.admission_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_discharge(mut self, date: NaiveDate) -> Self {
        self.discharge_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_length_of_stay(mut self, days: f64) -> Self {
        self.length_of_stay_days = Some(days);
        self
    }

    #[must_use]
    pub fn with_discharge_weekday(mut self, weekday: Weekday) -> Self {
        self.discharge_weekday = Some(weekday);
        self
    }

    /// Admitted and not yet discharged
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.admission_date.is_some() && self.discharge_date.is_none()
    }

    /// Discharge recorded before admission
    #[must_use]
    pub fn has_inverted_interval(&self) -> bool {
        matches!(
            (self.admission_date, self.discharge_date),
            (Some(admission), Some(discharge)) if discharge < admission
        )
    }

    /// Whether the patient occupied a bed on `day` (both ends inclusive)
    #[must_use]
    pub fn occupies(&self, day: NaiveDate) -> bool {
        match self.admission_date {
            Some(admission) if admission <= day => {
                self.discharge_date.is_none_or(|discharge| discharge >= day)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_patient_key_prefers_card() {
        assert_eq!(
            PatientKey::from_fields(Some("  123 "), Some("Maria")),
            PatientKey::HealthCard("123".to_string())
        );
        assert_eq!(
            PatientKey::from_fields(Some("   "), Some(" Maria ")),
            PatientKey::NameOnly("Maria".to_string())
        );
        assert_eq!(PatientKey::from_fields(None, Some("")), PatientKey::Anonymous);
        assert!(!PatientKey::NameOnly("Maria".into()).is_identified());
    }

    #[test]
    fn test_site_from_str() {
        assert_eq!("a".parse::<HospitalSite>().unwrap(), HospitalSite::A);
        assert_eq!(" B ".parse::<HospitalSite>().unwrap(), HospitalSite::B);
        assert!("C".parse::<HospitalSite>().is_err());
    }

    #[test]
    fn test_occupies_inclusive_bounds() {
        let episode = Episode::new(0, PatientKey::Anonymous, HospitalSite::A)
            .with_admission(date(2024, 1, 10))
            .with_discharge(date(2024, 1, 12));

        assert!(!episode.occupies(date(2024, 1, 9)));
        assert!(episode.occupies(date(2024, 1, 10)));
        assert!(episode.occupies(date(2024, 1, 12)));
        assert!(!episode.occupies(date(2024, 1, 13)));
    }

    #[test]
    fn test_open_episode_occupies_indefinitely() {
        let episode = Episode::new(0, PatientKey::Anonymous, HospitalSite::B)
            .with_admission(date(2024, 1, 10));
        assert!(episode.is_open());
        assert!(episode.occupies(date(2030, 1, 1)));
    }

    #[test]
    fn test_inverted_interval() {
        let episode = Episode::new(0, PatientKey::Anonymous, HospitalSite::A)
            .with_admission(date(2024, 1, 10))
            .with_discharge(date(2024, 1, 5));
        assert!(episode.has_inverted_interval());
        assert!(!episode.occupies(date(2024, 1, 7)));
    }
}
