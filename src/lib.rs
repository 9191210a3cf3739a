//! Hospital ward analytics: average length of stay, readmission rates, bed
//! occupancy and discharge weekday distribution computed from
//! hospitalization episode records.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod utils;

// Core types
pub use config::{AnalyticsConfig, SiteConfig};
pub use error::{AnalyticsError, Result};
pub use models::{AggregateResult, ChartPoint, CountedPoint, Episode, HospitalSite, PatientKey, RawEpisode};

// Pipeline entry points
pub use algorithm::{AnalyticsReport, build_report, normalize_records};

// Loading
pub use loader::{DEFAULT_BATCH_SIZE, load_episode_files_parallel, load_episodes_json, load_episodes_parquet};
