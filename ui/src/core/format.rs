//! Formatting helpers for presenting lab values and report dates.

use api::ReportDate;
use time::macros::format_description;

pub fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        "n/a".to_string()
    }
}

pub fn format_measurement(value: f64, unit: &str) -> String {
    let unit = unit.trim();
    if unit.is_empty() {
        format_number(value)
    } else {
        format!("{} {unit}", format_number(value))
    }
}

pub fn format_range(low: f64, high: f64) -> String {
    format!("{} - {}", format_number(low), format_number(high))
}

pub fn format_megabytes(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// `Mar 1, 2024`
pub fn format_report_date(date: ReportDate) -> String {
    date.date()
        .format(format_description!(
            "[month repr:short] [day padding:none], [year]"
        ))
        .unwrap_or_else(|_| date.to_string())
}
