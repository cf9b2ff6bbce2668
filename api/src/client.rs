//! `reqwest`-backed implementation of [`Backend`].
//!
//! Every endpoint answers with a JSON envelope carrying a `success` flag and,
//! on failure, an `error` string. Replies are decoded leniently (missing or
//! malformed bodies become an empty envelope) and then interpreted by the
//! pure `interpret_*` helpers, which hold all status-code policy.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{messages, ApiError};
use crate::types::{
    AuthGrant, Analysis, BiomarkerResult, Credentials, PdfUpload, Registration, RemoteTimelineEntry,
    ReportDate, ReportKind, User,
};

const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct AuthReply {
    #[serde(default)]
    success: bool,
    access_token: Option<String>,
    user: Option<User>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<BiomarkerResult>,
    report_date: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TimelineReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    timeline: Vec<RemoteTimelineEntry>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

#[derive(Serialize)]
struct SaveTimelineBody<'a> {
    date: ReportDate,
    results: &'a [BiomarkerResult],
}

#[derive(Serialize)]
struct PdfBody<'a> {
    #[serde(rename = "type")]
    kind: ReportKind,
    results: &'a [BiomarkerResult],
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}

fn connectivity() -> ApiError {
    ApiError::Connectivity(messages::CONNECTIVITY.to_string())
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    request.send().await.map_err(|_| connectivity())
}

/// Reads the status and a best-effort decoded envelope.
async fn read_reply<T: DeserializeOwned + Default>(response: Response) -> Result<(u16, T), ApiError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|_| connectivity())?;
    Ok((status, serde_json::from_str(&body).unwrap_or_default()))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn message_or(error: Option<String>, fallback: &str) -> String {
    error
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn interpret_auth(status: u16, reply: AuthReply, fallback: &str) -> Result<AuthGrant, ApiError> {
    if reply.success {
        if let (Some(access_token), Some(user)) = (reply.access_token, reply.user) {
            if is_success(status) && !access_token.is_empty() {
                return Ok(AuthGrant { access_token, user });
            }
        }
    }
    Err(ApiError::Authentication(message_or(reply.error, fallback)))
}

fn interpret_analysis(
    status: u16,
    reply: AnalyzeReply,
    token_sent: bool,
    submitted: ReportDate,
) -> Result<Analysis, ApiError> {
    if status == 401 && token_sent {
        return Err(ApiError::SessionExpired);
    }
    if is_success(status) && reply.success {
        let report_date = reply
            .report_date
            .as_deref()
            .and_then(ReportDate::parse)
            .unwrap_or(submitted);
        return Ok(Analysis {
            results: reply.results,
            report_date,
        });
    }
    Err(ApiError::Analysis(message_or(
        reply.error,
        messages::ANALYSIS_FAILED,
    )))
}

fn interpret_timeline(
    status: u16,
    reply: TimelineReply,
) -> Result<Vec<RemoteTimelineEntry>, ApiError> {
    if status == 401 {
        return Err(ApiError::SessionExpired);
    }
    if is_success(status) && reply.success {
        return Ok(reply.timeline);
    }
    Err(ApiError::Server {
        status,
        message: message_or(reply.error, messages::TIMELINE_UNAVAILABLE),
    })
}

fn interpret_save(status: u16, reply: ErrorReply) -> Result<(), ApiError> {
    if status == 401 {
        return Err(ApiError::SessionExpired);
    }
    if is_success(status) {
        return Ok(());
    }
    Err(ApiError::Server {
        status,
        message: message_or(reply.error, messages::TIMELINE_NOT_SAVED),
    })
}

fn export_failure(kind: ReportKind) -> ApiError {
    ApiError::Export(format!("Error generating {} report.", kind.as_str()))
}

#[async_trait(?Send)]
impl Backend for ApiClient {
    async fn register(&self, form: &Registration) -> Result<AuthGrant, ApiError> {
        let response = send(self.http.post(self.url("users/register")).json(form)).await?;
        let (status, reply) = read_reply::<AuthReply>(response).await?;
        interpret_auth(status, reply, messages::REGISTER_FAILED)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let response = send(self.http.post(self.url("users/login")).json(credentials)).await?;
        let (status, reply) = read_reply::<AuthReply>(response).await?;
        interpret_auth(status, reply, messages::LOGIN_FAILED)
    }

    async fn analyze(
        &self,
        token: Option<&str>,
        upload: &PdfUpload,
        date: ReportDate,
    ) -> Result<Analysis, ApiError> {
        let file = Part::bytes(upload.bytes.clone())
            .file_name(upload.name.clone())
            .mime_str(PDF_MIME)
            .map_err(|err| ApiError::Analysis(format!("Unable to attach {}: {err}", upload.name)))?;
        let form = Form::new().part("files", file).text("date", date.to_string());

        let request = with_bearer(self.http.post(self.url("analyze")), token).multipart(form);
        let (status, reply) = read_reply::<AnalyzeReply>(send(request).await?).await?;
        interpret_analysis(status, reply, token.is_some(), date)
    }

    async fn save_timeline(
        &self,
        token: &str,
        date: ReportDate,
        results: &[BiomarkerResult],
    ) -> Result<(), ApiError> {
        let body = SaveTimelineBody { date, results };
        let request = with_bearer(self.http.post(self.url("save-timeline")), Some(token)).json(&body);
        let (status, reply) = read_reply::<ErrorReply>(send(request).await?).await?;
        interpret_save(status, reply)
    }

    async fn timeline(&self, token: &str) -> Result<Vec<RemoteTimelineEntry>, ApiError> {
        let request = with_bearer(self.http.get(self.url("timeline")), Some(token));
        let (status, reply) = read_reply::<TimelineReply>(send(request).await?).await?;
        interpret_timeline(status, reply)
    }

    async fn generate_pdf(
        &self,
        token: Option<&str>,
        kind: ReportKind,
        results: &[BiomarkerResult],
    ) -> Result<Vec<u8>, ApiError> {
        let body = PdfBody { kind, results };
        let request = with_bearer(self.http.post(self.url("generate-pdf")), token).json(&body);
        let response = request
            .send()
            .await
            .map_err(|_| ApiError::Export(messages::EXPORT_CONNECTIVITY.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 && token.is_some() {
            return Err(ApiError::SessionExpired);
        }
        if !is_success(status) {
            return Err(export_failure(kind));
        }
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|_| export_failure(kind))
    }
}
