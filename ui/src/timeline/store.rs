//! Dated history of analyses, kept in ascending date order.

use api::{RemoteTimelineEntry, ReportDate, ResultSet};
use serde::{Deserialize, Serialize};

use crate::report::{summarize, Summary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredEntry", into = "StoredEntry")]
pub struct TimelineEntry {
    date: ReportDate,
    results: ResultSet,
    summary: Summary,
}

/// Shape written to the local snapshot; summaries are recomputed on load.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    date: ReportDate,
    #[serde(default)]
    results: ResultSet,
}

impl From<StoredEntry> for TimelineEntry {
    fn from(stored: StoredEntry) -> Self {
        Self::new(stored.date, stored.results)
    }
}

impl From<TimelineEntry> for StoredEntry {
    fn from(entry: TimelineEntry) -> Self {
        Self {
            date: entry.date,
            results: entry.results,
        }
    }
}

impl From<RemoteTimelineEntry> for TimelineEntry {
    fn from(remote: RemoteTimelineEntry) -> Self {
        Self::new(remote.date, remote.results)
    }
}

impl TimelineEntry {
    pub fn new(date: ReportDate, results: ResultSet) -> Self {
        let summary = summarize(&results);
        Self {
            date,
            results,
            summary,
        }
    }

    pub fn date(&self) -> ReportDate {
        self.date
    }

    pub fn results(&self) -> &[api::BiomarkerResult] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Builds a timeline from entries in any order.
    pub fn from_entries(entries: impl IntoIterator<Item = TimelineEntry>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(TimelineEntry::date);
        Self { entries }
    }

    /// Inserts after every entry with the same or an earlier date and returns
    /// the new entry's position.
    pub fn append(&mut self, results: ResultSet, date: ReportDate) -> usize {
        let at = self.entries.partition_point(|entry| entry.date <= date);
        self.entries.insert(at, TimelineEntry::new(date, results));
        at
    }

    /// Discards local contents in favour of the server's copy.
    pub fn replace_from_remote(&mut self, remote: Vec<RemoteTimelineEntry>) {
        *self = Self::from_entries(remote.into_iter().map(TimelineEntry::from));
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
