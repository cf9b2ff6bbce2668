use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{
    AuthGrant, Analysis, BiomarkerResult, Credentials, PdfUpload, Registration, RemoteTimelineEntry,
    ReportDate, ReportKind,
};

/// The remote analysis service as seen by the front-end.
///
/// `token` is `None` when no session exists; implementations then send the
/// request without an `Authorization` header.
#[async_trait(?Send)]
pub trait Backend {
    async fn register(&self, form: &Registration) -> Result<AuthGrant, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError>;

    async fn analyze(
        &self,
        token: Option<&str>,
        upload: &PdfUpload,
        date: ReportDate,
    ) -> Result<Analysis, ApiError>;

    async fn save_timeline(
        &self,
        token: &str,
        date: ReportDate,
        results: &[BiomarkerResult],
    ) -> Result<(), ApiError>;

    async fn timeline(&self, token: &str) -> Result<Vec<RemoteTimelineEntry>, ApiError>;

    async fn generate_pdf(
        &self,
        token: Option<&str>,
        kind: ReportKind,
        results: &[BiomarkerResult],
    ) -> Result<Vec<u8>, ApiError>;
}
