//! Data models for hospitalization episodes and computed aggregates
//!
//! `RawEpisode` is the record shape handed over by the data-fetch layer.
//! `Episode` is the normalized, immutable form every algorithm consumes.

pub mod aggregate;
pub mod episode;
pub mod raw;
pub mod series;

pub use aggregate::{AggregateResult, ChartPoint, CountedPoint, FormattedAggregate};
pub use episode::{Episode, HospitalSite, PatientKey};
pub use raw::{RawEpisode, RawWeekday};
pub use series::{PatientSeries, SeriesKey};
