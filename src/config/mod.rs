//! Configuration for the analytics core.
//!
//! Bed capacities, reporting floor dates and readmission windows are inputs,
//! never constants inside the algorithms, so one code path serves every site.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::algorithm::length_of_stay::OngoingStayPolicy;
use crate::algorithm::readmission::ReadmissionWindows;
use crate::error::{AnalyticsError, Result};
use crate::models::HospitalSite;
use crate::utils::format::DecimalSeparator;

/// Environment variable holding the path of a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "WARD_METRICS_CONFIG";

/// Default readmission windows in days
pub const DEFAULT_READMISSION_WINDOWS: [u32; 3] = [7, 15, 30];

/// Per-site reporting parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Number of staffed beds
    pub capacity: u32,
    /// Occupancy reports never start before this date
    pub floor_date: NaiveDate,
}

impl SiteConfig {
    #[must_use]
    pub fn new(capacity: u32, floor_date: NaiveDate) -> Self {
        Self {
            capacity,
            floor_date,
        }
    }

    /// Whether `date` falls on or after the reporting floor
    #[must_use]
    pub fn is_date_reportable(&self, date: NaiveDate) -> bool {
        date >= self.floor_date
    }
}

/// Configuration for one analytics run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub site_a: SiteConfig,
    pub site_b: SiteConfig,
    /// Gap thresholds in days; sorted and deduplicated before use
    pub readmission_windows: Vec<u32>,
    /// Count still-admitted patients in average length of stay using the
    /// days elapsed so far, instead of leaving them out
    pub include_ongoing_as_elapsed: bool,
    /// Decimal convention for formatted output
    pub decimal_separator: DecimalSeparator,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            site_a: SiteConfig::new(16, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()),
            site_b: SiteConfig::new(10, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()),
            readmission_windows: DEFAULT_READMISSION_WINDOWS.to_vec(),
            include_ongoing_as_elapsed: false,
            decimal_separator: DecimalSeparator::Comma,
        }
    }
}

impl AnalyticsConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded analytics configuration from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `WARD_METRICS_CONFIG`, or use defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Check that the configuration can produce a report
    pub fn validate(&self) -> Result<()> {
        if self.readmission_windows.is_empty() {
            return Err(AnalyticsError::InvalidConfig(
                "readmission_windows cannot be empty".into(),
            ));
        }

        for (site, config) in [(HospitalSite::A, &self.site_a), (HospitalSite::B, &self.site_b)] {
            if config.capacity == 0 {
                log::warn!("Site {site} has zero bed capacity; occupancy will report 0%");
            }
        }

        Ok(())
    }

    /// Parameters for one site
    #[must_use]
    pub fn site(&self, site: HospitalSite) -> &SiteConfig {
        match site {
            HospitalSite::A => &self.site_a,
            HospitalSite::B => &self.site_b,
        }
    }

    /// Override the parameters of one site
    #[must_use]
    pub fn with_site(mut self, site: HospitalSite, config: SiteConfig) -> Self {
        match site {
            HospitalSite::A => self.site_a = config,
            HospitalSite::B => self.site_b = config,
        }
        self
    }

    #[must_use]
    pub fn with_readmission_windows(mut self, windows: &[u32]) -> Self {
        self.readmission_windows = windows.to_vec();
        self
    }

    #[must_use]
    pub fn with_ongoing_as_elapsed(mut self, include: bool) -> Self {
        self.include_ongoing_as_elapsed = include;
        self
    }

    #[must_use]
    pub fn with_decimal_separator(mut self, separator: DecimalSeparator) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Validated readmission windows
    pub fn windows(&self) -> Result<ReadmissionWindows> {
        ReadmissionWindows::new(&self.readmission_windows)
    }

    /// Ongoing-stay policy for length of stay, measured up to `as_of`
    #[must_use]
    pub fn ongoing_stay_policy(&self, as_of: NaiveDate) -> OngoingStayPolicy {
        if self.include_ongoing_as_elapsed {
            OngoingStayPolicy::ElapsedUntil(as_of)
        } else {
            OngoingStayPolicy::Exclude
        }
    }
}

impl fmt::Display for AnalyticsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analytics Configuration:")?;
        writeln!(
            f,
            "  Site A: {} beds, floor {}",
            self.site_a.capacity, self.site_a.floor_date
        )?;
        writeln!(
            f,
            "  Site B: {} beds, floor {}",
            self.site_b.capacity, self.site_b.floor_date
        )?;
        writeln!(f, "  Readmission Windows: {:?}", self.readmission_windows)?;
        writeln!(
            f,
            "  Ongoing Stays In LOS: {}",
            self.include_ongoing_as_elapsed
        )?;
        writeln!(f, "  Decimal Separator: {:?}", self.decimal_separator)?;
        Ok(())
    }
}
