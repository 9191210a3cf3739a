//! Clinical indicator algorithms
//!
//! Pure functions over in-memory episode slices: record normalization,
//! patient grouping, and the indicators built on top of them (length of
//! stay, readmission, occupancy and discharge weekdays).

pub mod grouping;
pub mod length_of_stay;
pub mod normalize;
pub mod occupancy;
pub mod readmission;
pub mod report;
pub mod weekday;

pub use grouping::{PatientGroups, group_by_patient};
pub use length_of_stay::{LengthOfStaySummary, OngoingStayPolicy, average_stay, length_of_stay_summary};
pub use normalize::{DataQualityReport, NormalizedEpisodes, normalize_records, parse_local_date};
pub use occupancy::{OccupancySummary, ReportingWindow, average_occupancy, occupancy_summary, reporting_window};
pub use readmission::{ReadmissionSummary, ReadmissionWindows, classify_readmissions};
pub use report::{AnalyticsReport, build_report, report_from_episodes};
pub use weekday::{WeekdayDistribution, weekday_distribution, weekday_distribution_between};
