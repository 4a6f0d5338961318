//! Timestamp handling for real-time predictions.
//!
//! Providers send ISO-8601 strings, either with a `Z` suffix or an explicit
//! UTC offset. Everything in the core works on offset-carrying instants
//! (`DateTime<FixedOffset>`), so a timestamp without an offset is rejected
//! here rather than silently assumed to be UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Serializer;

/// Error returned when a timestamp cannot be turned into an instant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Whether the input was a well-formed local time lacking an offset.
    pub fn is_naive(&self) -> bool {
        self.reason == NAIVE_REASON
    }
}

const NAIVE_REASON: &str = "missing UTC offset (timezone-aware instant required)";

/// Parse an ISO-8601 timestamp that carries a UTC offset.
///
/// # Examples
///
/// ```
/// use transit_server::domain::parse_instant;
///
/// assert!(parse_instant("2026-01-20T12:00:00Z").is_ok());
/// assert!(parse_instant("2026-01-20T12:00:00-05:00").is_ok());
///
/// // Naive timestamps are rejected
/// let err = parse_instant("2026-01-20T12:00:00").unwrap_err();
/// assert!(err.is_naive());
/// ```
pub fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::new("empty string"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    // Minute precision with an offset, e.g. "2026-01-20T12:05-05:00"
    let with_offset = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z") {
        return Ok(dt);
    }

    let naive_formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    if naive_formats
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
    {
        return Err(TimeError::new(NAIVE_REASON));
    }

    Err(TimeError::new("not an ISO-8601 timestamp"))
}

/// Format an instant as RFC 3339, keeping its offset (`+00:00`, never `Z`).
pub fn format_instant(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339()
}

/// `serialize_with` adapter for [`format_instant`].
pub fn serialize_instant<S: Serializer>(
    dt: &DateTime<FixedOffset>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_instant(dt))
}

/// Format an instant as "HH:MM" in UTC.
pub fn format_hhmm_utc(dt: &DateTime<FixedOffset>) -> String {
    dt.with_timezone(&Utc).format("%H:%M").to_string()
}
