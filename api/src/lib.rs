//! Backend-facing crate for MediLab: wire types shared with the UI, the
//! [`Backend`] seam, and the HTTP client that implements it.

pub mod backend;
pub mod client;
pub mod error;
pub mod types;

pub use backend::Backend;
pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    AuthGrant, Analysis, BiomarkerResult, Credentials, PdfUpload, Registration, RemoteTimelineEntry,
    ReportDate, ReportKind, ResultSet, Status, User,
};
