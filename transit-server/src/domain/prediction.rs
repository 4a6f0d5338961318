//! Normalized real-time predictions.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One real-time arrival/departure prediction at a stop.
///
/// Only `stop_id` is guaranteed. A prediction with neither an arrival nor a
/// departure time can exist, but it carries nothing the estimator can use;
/// consumers filter on the time they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    /// Stop the prediction is for.
    pub stop_id: String,

    /// Route serving the stop, if reported.
    pub route_id: Option<String>,

    /// Trip (one vehicle run), shared between stops along the route.
    pub trip_id: Option<String>,

    /// Direction of travel (0 or 1 for MBTA).
    pub direction_id: Option<i64>,

    /// Predicted arrival at the stop.
    pub arrival_time: Option<DateTime<FixedOffset>>,

    /// Predicted departure from the stop.
    pub departure_time: Option<DateTime<FixedOffset>>,
}

impl Prediction {
    /// Create a prediction for a stop with no other data.
    pub fn new(stop_id: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            route_id: None,
            trip_id: None,
            direction_id: None,
            arrival_time: None,
            departure_time: None,
        }
    }

    /// Set the route.
    pub fn with_route(mut self, route_id: impl Into<String>) -> Self {
        self.route_id = Some(route_id.into());
        self
    }

    /// Set the trip.
    pub fn with_trip(mut self, trip_id: impl Into<String>) -> Self {
        self.trip_id = Some(trip_id.into());
        self
    }

    /// Set the arrival time.
    pub fn with_arrival(mut self, t: DateTime<FixedOffset>) -> Self {
        self.arrival_time = Some(t);
        self
    }

    /// Set the departure time.
    pub fn with_departure(mut self, t: DateTime<FixedOffset>) -> Self {
        self.departure_time = Some(t);
        self
    }

    /// Best known time the vehicle is at this stop.
    ///
    /// Prefers arrival; falls back to departure (first stops of a trip
    /// often only report a departure).
    pub fn best_arrival(&self) -> Option<DateTime<FixedOffset>> {
        self.arrival_time.or(self.departure_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(m: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2026, 1, 20, 12, m, 0)
            .unwrap()
            .fixed_offset()
    }

    #[test]
    fn new_has_only_stop() {
        let p = Prediction::new("place-davis");
        assert_eq!(p.stop_id, "place-davis");
        assert!(p.route_id.is_none());
        assert!(p.trip_id.is_none());
        assert!(p.direction_id.is_none());
        assert!(p.best_arrival().is_none());
    }

    #[test]
    fn best_arrival_prefers_arrival() {
        let p = Prediction::new("s").with_arrival(at(10)).with_departure(at(11));
        assert_eq!(p.best_arrival(), Some(at(10)));
    }

    #[test]
    fn best_arrival_falls_back_to_departure() {
        let p = Prediction::new("s").with_departure(at(11));
        assert_eq!(p.best_arrival(), Some(at(11)));
    }
}
