//! Server-side copies of the timeline.

use api::{ApiError, Backend, RemoteTimelineEntry, ReportDate, ResultSet};

/// One analysis waiting to be saved to the signed-in user's timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistJob {
    pub token: String,
    pub date: ReportDate,
    pub results: ResultSet,
}

impl PersistJob {
    pub async fn run(&self, backend: &dyn Backend) -> Result<(), ApiError> {
        backend
            .save_timeline(&self.token, self.date, &self.results)
            .await
    }
}

/// A fetch of the server timeline, tagged so late replies can be ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLoad {
    pub ticket: u64,
    pub token: String,
}

impl TimelineLoad {
    pub async fn fetch(&self, backend: &dyn Backend) -> Result<Vec<RemoteTimelineEntry>, ApiError> {
        backend.timeline(&self.token).await
    }
}

/// What happened to the local timeline when a load finished.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Replaced(usize),
    Stale,
    Failed(ApiError),
}
