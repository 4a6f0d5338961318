//! Conversion from MBTA DTOs to domain predictions.
//!
//! Normalization is deliberately lenient: a record is dropped only when its
//! stop cannot be identified, and any other missing or malformed field
//! becomes `None` on the resulting [`Prediction`].

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::{Prediction, parse_instant};

use super::types::{PredictionResource, PredictionsDocument, Relationship};

/// Convert a predictions document into domain predictions.
///
/// Output order matches the order of `doc.data`; records without a
/// resolvable stop ID are skipped.
pub fn normalize(doc: &PredictionsDocument) -> Vec<Prediction> {
    let mut out = Vec::with_capacity(doc.data.len());

    for (idx, record) in doc.data.iter().enumerate() {
        match normalize_record(record) {
            Some(p) => out.push(p),
            None => debug!(index = idx, "skipping prediction without a stop id"),
        }
    }

    out
}

/// Convert a single prediction resource.
///
/// Returns `None` only when the stop ID is missing.
pub fn normalize_record(record: &PredictionResource) -> Option<Prediction> {
    let rel = record.relationships.as_ref();
    let stop_id = rel.and_then(|r| related_id(r.stop.as_ref()))?;

    let attrs = record.attributes.as_ref();

    Some(Prediction {
        stop_id: stop_id.to_string(),
        route_id: rel
            .and_then(|r| related_id(r.route.as_ref()))
            .map(str::to_string),
        trip_id: rel
            .and_then(|r| related_id(r.trip.as_ref()))
            .map(str::to_string),
        direction_id: attrs.and_then(|a| parse_direction(a.direction_id.as_ref())),
        arrival_time: attrs.and_then(|a| parse_time(a.arrival_time.as_ref())),
        departure_time: attrs.and_then(|a| parse_time(a.departure_time.as_ref())),
    })
}

fn related_id(rel: Option<&Relationship>) -> Option<&str> {
    rel?.id()
}

/// Direction must be a JSON integer; anything else is treated as absent.
fn parse_direction(value: Option<&Value>) -> Option<i64> {
    value?.as_i64()
}

/// Parse a timestamp field, treating null, non-strings and unparsable
/// strings as absent.
fn parse_time(value: Option<&Value>) -> Option<DateTime<FixedOffset>> {
    let s = value?.as_str()?;
    match parse_instant(s) {
        Ok(dt) => Some(dt),
        Err(e) => {
            trace!(value = s, error = %e, "ignoring unparsable prediction time");
            None
        }
    }
}
