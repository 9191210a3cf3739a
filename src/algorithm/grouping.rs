//! Patient identity grouping
//!
//! Buckets episodes into per-patient chronological series. The health-card
//! number is the only trusted identity. Episodes without one are grouped by
//! name when a name exists, but those series are flagged as unidentified:
//! two different patients with the same name would otherwise be merged and
//! corrupt the readmission rate.

use rustc_hash::FxHashMap;

use crate::models::{Episode, PatientKey, PatientSeries, SeriesKey};

/// Every series built from a dataset, in first-appearance order
#[derive(Debug, Clone, Default)]
pub struct PatientGroups<'a> {
    series: Vec<PatientSeries<'a>>,
    /// Episodes left out of every series because their admission date is unknown
    pub undated: usize,
}

impl<'a> PatientGroups<'a> {
    /// All series, identified or not
    #[must_use]
    pub fn all(&self) -> &[PatientSeries<'a>] {
        &self.series
    }

    /// Series keyed by a health-card number
    pub fn identified(&self) -> impl Iterator<Item = &PatientSeries<'a>> {
        self.series.iter().filter(|s| s.is_identified())
    }

    /// Series with an unknown identity
    pub fn unidentified(&self) -> impl Iterator<Item = &PatientSeries<'a>> {
        self.series.iter().filter(|s| !s.is_identified())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn series_key(episode: &Episode) -> SeriesKey {
    match &episode.patient_key {
        PatientKey::HealthCard(card) => SeriesKey::HealthCard(card.clone()),
        PatientKey::NameOnly(name) => SeriesKey::Name(name.clone()),
        PatientKey::Anonymous => SeriesKey::Record(episode.record_index),
    }
}

/// Group episodes into patient series
///
/// Episodes without an admission date cannot be placed in time and are
/// counted in [`PatientGroups::undated`] instead.
#[must_use]
pub fn group_by_patient(episodes: &[Episode]) -> PatientGroups<'_> {
    let mut index: FxHashMap<SeriesKey, usize> = FxHashMap::default();
    let mut buckets: Vec<(SeriesKey, Vec<&Episode>)> = Vec::new();
    let mut undated = 0;

    for episode in episodes {
        if episode.admission_date.is_none() {
            undated += 1;
            continue;
        }

        let key = series_key(episode);
        match index.get(&key) {
            Some(&slot) => buckets[slot].1.push(episode),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![episode]));
            }
        }
    }

    let series: Vec<PatientSeries<'_>> = buckets
        .into_iter()
        .map(|(key, members)| PatientSeries::new(key, members))
        .collect();

    log::debug!(
        "Grouped {} episodes into {} patient series ({} undated)",
        episodes.len(),
        series.len(),
        undated
    );

    PatientGroups { series, undated }
}
