// File: crates/datechart-core/src/format.rs
// Summary: Date label formatting for bucket timestamps.

use chrono::{DateTime, Datelike, Utc};

/// Turns a bucket timestamp (UTC milliseconds) into label text.
pub trait DateFormatter {
    fn format(&self, timestamp_ms: f64) -> String;
}

/// `MMM Do, YYYY` in UTC, e.g. `Jan 1st, 2015`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrdinalDateFormatter;

impl DateFormatter for OrdinalDateFormatter {
    fn format(&self, timestamp_ms: f64) -> String {
        match utc_from_millis(timestamp_ms) {
            Some(dt) => format!(
                "{} {}{}, {}",
                dt.format("%b"),
                dt.day(),
                ordinal_suffix(dt.day()),
                dt.year()
            ),
            None => "Invalid date".to_string(),
        }
    }
}

/// Any `strftime` pattern understood by chrono, applied in UTC.
#[derive(Clone, Debug)]
pub struct PatternDateFormatter {
    pub pattern: String,
}

impl PatternDateFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into() }
    }
}

impl DateFormatter for PatternDateFormatter {
    fn format(&self, timestamp_ms: f64) -> String {
        match utc_from_millis(timestamp_ms) {
            Some(dt) => dt.format(&self.pattern).to_string(),
            None => "Invalid date".to_string(),
        }
    }
}

pub fn utc_from_millis(timestamp_ms: f64) -> Option<DateTime<Utc>> {
    if !timestamp_ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(timestamp_ms.round() as i64)
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
