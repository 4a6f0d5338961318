//! MBTA v3 API response DTOs.
//!
//! The predictions endpoint returns a JSON:API document. Provider payloads
//! are not guaranteed complete or well-typed, so leaf values are kept as
//! untyped JSON and interpreted field by field during normalization. A
//! wrong-typed leaf must never fail deserialization of the whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from `GET /predictions`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionsDocument {
    /// Prediction resources, in the order the API returned them.
    #[serde(default)]
    pub data: Vec<PredictionResource>,
}

impl PredictionsDocument {
    /// Number of raw records in the document.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the document has no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A single prediction resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionResource {
    /// Timing and direction attributes.
    pub attributes: Option<PredictionAttributes>,

    /// Links to the stop, route and trip.
    pub relationships: Option<PredictionRelationships>,
}

/// Attributes of a prediction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionAttributes {
    /// Predicted arrival (ISO-8601 string or null).
    pub arrival_time: Option<Value>,

    /// Predicted departure (ISO-8601 string or null).
    pub departure_time: Option<Value>,

    /// Direction of travel (integer 0/1).
    pub direction_id: Option<Value>,
}

/// Relationships of a prediction.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionRelationships {
    pub stop: Option<Relationship>,
    pub route: Option<Relationship>,
    pub trip: Option<Relationship>,
}

/// A to-one relationship: `{"data": {"id": "...", "type": "..."}}`.
///
/// `data` is kept untyped; it may be null, or malformed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Relationship {
    pub data: Option<Value>,
}

impl Relationship {
    /// The related resource's ID, if present and a non-empty string.
    pub fn id(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("id")?
            .as_str()
            .filter(|id| !id.is_empty())
    }
}
