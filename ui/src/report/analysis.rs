use api::{Analysis, ApiError, Backend, PdfUpload, ReportDate};

use crate::timeline::PersistJob;

pub const MISSING_FILE: &str = "Please upload at least one PDF file";
pub const MISSING_DATE: &str = "Please select a report date";
pub const INVALID_DATE: &str = "Please select a valid report date";
pub const LOGIN_TO_ANALYZE: &str = "Please log in to analyze reports.";

/// A validated analyze call for the first staged file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub ticket: u64,
    pub token: Option<String>,
    pub upload: PdfUpload,
    pub date: ReportDate,
}

impl AnalysisRequest {
    pub async fn send(&self, backend: &dyn Backend) -> Result<Analysis, ApiError> {
        backend
            .analyze(self.token.as_deref(), &self.upload, self.date)
            .await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Results are on screen and in the timeline at `index`; `persist` is set
    /// when a session exists to save them remotely.
    Applied {
        index: usize,
        result_count: usize,
        persist: Option<PersistJob>,
    },
    /// A newer analysis was started before this one finished.
    Stale,
}
