//! Wire types exchanged with the analysis backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

/// Backend-assigned classification of a value against its reference range.
///
/// The client never recomputes this; unknown labels decode to `Unknown` so a
/// new backend status does not break decoding of the whole result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Normal,
    Near,
    Low,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Near => "Near",
            Self::Low => "Low",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_abnormal(self) -> bool {
        matches!(self, Self::Low | Self::High)
    }
}

/// One measured lab value.
///
/// The extractor writes `null` for numbers it could not read; those decode to
/// NaN (and a missing unit or status to its empty form) so one sparse row does
/// not sink the rest of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerResult {
    pub test: String,
    #[serde(deserialize_with = "nan_if_null")]
    pub value: f64,
    #[serde(default, deserialize_with = "default_if_null")]
    pub unit: String,
    #[serde(rename = "refLow", default = "not_a_number", deserialize_with = "nan_if_null")]
    pub ref_low: f64,
    #[serde(rename = "refHigh", default = "not_a_number", deserialize_with = "nan_if_null")]
    pub ref_high: f64,
    #[serde(default, deserialize_with = "default_if_null")]
    pub status: Status,
}

fn not_a_number() -> f64 {
    f64::NAN
}

fn nan_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Results of one analysis call, in display order.
pub type ResultSet = Vec<BiomarkerResult>;

/// Calendar date of a report (no time component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(Date);

impl ReportDate {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn date(self) -> Date {
        self.0
    }

    /// Parses `YYYY-MM-DD`, a naive ISO datetime, or an RFC 3339 timestamp.
    ///
    /// Timestamps carrying an offset are converted to UTC before the time
    /// component is dropped; naive datetimes keep their calendar date.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Some(Self(ts.to_offset(UtcOffset::UTC).date()));
        }
        let day = raw.get(..10)?;
        Date::parse(day, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month() as u8,
            self.0.day()
        )
    }
}

impl Serialize for ReportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReportDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ReportDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised report date `{raw}`")))
    }
}

/// Audience of a generated PDF report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Patient,
    Doctor,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}_report.pdf", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Identity plus bearer token returned by login/registration.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// A PDF queued for the analyze endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Successful analysis: results plus the backend-confirmed report date.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub results: ResultSet,
    pub report_date: ReportDate,
}

/// One stored timeline entry as served by `GET /timeline`.
///
/// Any `summary` the server sends is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteTimelineEntry {
    pub date: ReportDate,
    #[serde(default)]
    pub results: ResultSet,
}
