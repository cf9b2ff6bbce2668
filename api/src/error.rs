use thiserror::Error;

/// User-facing fallback copy for failures whose body carried no message.
pub mod messages {
    pub const ANALYSIS_FAILED: &str = "Error processing reports. Check your PDF format.";
    pub const LOGIN_FAILED: &str = "Invalid credentials.";
    pub const REGISTER_FAILED: &str = "Registration failed.";
    pub const CONNECTIVITY: &str = "Connection error. Check your network and try again.";
    pub const EXPORT_CONNECTIVITY: &str = "Connection error during PDF generation.";
    pub const TIMELINE_UNAVAILABLE: &str = "Unable to load your timeline.";
    pub const TIMELINE_NOT_SAVED: &str = "Unable to save timeline entry.";
}

/// Every failure the front-end can observe while talking to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// A required field was missing; raised before any request is issued.
    #[error("{0}")]
    Validation(String),
    /// Login or registration was rejected.
    #[error("{0}")]
    Authentication(String),
    /// An authenticated call came back 401.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    #[error("{0}")]
    Analysis(String),
    /// No response was received.
    #[error("{0}")]
    Connectivity(String),
    #[error("{0}")]
    Export(String),
    #[error("Server responded with {status}: {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
