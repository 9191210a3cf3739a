//! Per-patient chronological episode series

use itertools::Itertools;

use super::episode::Episode;

/// Key a series was grouped under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeriesKey {
    /// Card holder, the only identity readmission analysis trusts
    HealthCard(String),
    /// Unknown identity grouped by name; may mix several people
    Name(String),
    /// Unknown identity with no name; one record per series
    Record(usize),
}

/// One patient's episodes, sorted by admission date
///
/// Every episode in a series has an admission date.
#[derive(Debug, Clone)]
pub struct PatientSeries<'a> {
    key: SeriesKey,
    episodes: Vec<&'a Episode>,
}

impl<'a> PatientSeries<'a> {
    /// Build a series, stable-sorting by admission date
    ///
    /// Episodes sharing an admission date keep their input order.
    #[must_use]
    pub fn new(key: SeriesKey, mut episodes: Vec<&'a Episode>) -> Self {
        episodes.sort_by_key(|e| (e.admission_date, e.record_index));
        Self { key, episodes }
    }

    #[must_use]
    pub fn key(&self) -> &SeriesKey {
        &self.key
    }

    #[must_use]
    pub fn is_identified(&self) -> bool {
        matches!(self.key, SeriesKey::HealthCard(_))
    }

    #[must_use]
    pub fn episodes(&self) -> &[&'a Episode] {
        &self.episodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Consecutive `(earlier, later)` pairs in chronological order
    pub fn consecutive_pairs(&self) -> impl Iterator<Item = (&'a Episode, &'a Episode)> + '_ {
        self.episodes.iter().copied().tuple_windows()
    }
}
