//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::format_instant;
use crate::estimate::{EtaEstimate, JourneyEstimate, ReliabilityReport};
use crate::reference::{RouteRef, StopRef};

/// Request to estimate a journey.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateRequest {
    /// Stop to depart from (e.g., "place-davis")
    pub origin_stop_id: String,

    /// Stop to arrive at
    pub destination_stop_id: String,

    /// Route to travel on (e.g., "Red")
    pub route_id: String,
}

/// Arrival estimate with uncertainty bands.
#[derive(Debug, Serialize)]
pub struct EtaResponse {
    /// Departure from the origin (ISO-8601)
    pub depart_time: String,

    /// Median arrival (ISO-8601)
    pub p50_arrival: String,

    /// 80th percentile arrival (ISO-8601)
    pub p80_arrival: String,

    /// 90th percentile arrival (ISO-8601)
    pub p90_arrival: String,

    /// Measured headway, if any
    pub headway_seconds: Option<i64>,

    /// Why the bands are as wide as they are
    pub explanation: String,
}

/// Reliability score with reasons.
#[derive(Debug, Serialize)]
pub struct ReliabilityResponse {
    /// 0 to 100
    pub score: u8,

    /// Reasons, most significant first
    pub reasons: Vec<String>,
}

/// Response to an estimate request.
#[derive(Debug, Serialize)]
pub struct JourneyEstimateResponse {
    pub route_id: String,
    pub trip_id: String,

    /// When the estimate was made (ISO-8601)
    pub generated_at: String,

    pub eta: EtaResponse,
    pub reliability: ReliabilityResponse,

    /// One-paragraph human summary
    pub summary: String,
}

/// A stop in the stops listing.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub stop_id: String,
    pub stop_name: String,
}

/// A route in the routes listing.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl EtaResponse {
    pub fn from_estimate(eta: &EtaEstimate) -> Self {
        Self {
            depart_time: format_instant(&eta.depart_time),
            p50_arrival: format_instant(&eta.p50_arrival),
            p80_arrival: format_instant(&eta.p80_arrival),
            p90_arrival: format_instant(&eta.p90_arrival),
            headway_seconds: eta.headway_seconds,
            explanation: eta.explanation.clone(),
        }
    }
}

impl ReliabilityResponse {
    pub fn from_report(report: &ReliabilityReport) -> Self {
        Self {
            score: report.score,
            reasons: report.reasons.clone(),
        }
    }
}

impl JourneyEstimateResponse {
    /// Build the response for an estimate and its rendered summary.
    pub fn from_estimate(estimate: &JourneyEstimate, summary: String) -> Self {
        Self {
            route_id: estimate.route_id.clone(),
            trip_id: estimate.trip_id.clone(),
            generated_at: format_instant(&estimate.generated_at),
            eta: EtaResponse::from_estimate(&estimate.eta),
            reliability: ReliabilityResponse::from_report(&estimate.reliability),
            summary,
        }
    }
}

impl From<&StopRef> for StopResult {
    fn from(stop: &StopRef) -> Self {
        Self {
            stop_id: stop.stop_id.clone(),
            stop_name: stop.stop_name.clone(),
        }
    }
}

impl From<&RouteRef> for RouteResult {
    fn from(route: &RouteRef) -> Self {
        Self {
            route_id: route.route_id.clone(),
            route_short_name: route.route_short_name.clone(),
            route_long_name: route.route_long_name.clone(),
        }
    }
}
