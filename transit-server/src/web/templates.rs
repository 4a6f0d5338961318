//! Askama templates for human-readable output.

use askama::Template;

use crate::domain::format_hhmm_utc;
use crate::estimate::JourneyEstimate;

/// Shown when an estimate carries no reliability reasons.
const NO_RELIABILITY_NOTE: &str = "Reliability information unavailable.";

/// One-paragraph journey summary.
#[derive(Template)]
#[template(
    source = "Take the {{ route_id }} Line. Depart around {{ depart }}. Expected arrival between {{ p50 }} and {{ p90 }}. {{ note }}",
    ext = "txt"
)]
pub struct JourneySummaryTemplate<'a> {
    pub route_id: &'a str,
    pub depart: String,
    pub p50: String,
    pub p90: String,
    pub note: &'a str,
}

impl<'a> JourneySummaryTemplate<'a> {
    /// Times are rendered as UTC hour:minute.
    pub fn from_estimate(estimate: &'a JourneyEstimate) -> Self {
        Self {
            route_id: &estimate.route_id,
            depart: format_hhmm_utc(&estimate.eta.depart_time),
            p50: format_hhmm_utc(&estimate.eta.p50_arrival),
            p90: format_hhmm_utc(&estimate.eta.p90_arrival),
            note: estimate
                .reliability
                .reasons
                .first()
                .map_or(NO_RELIABILITY_NOTE, String::as_str),
        }
    }
}

/// Render the summary for an estimate.
pub fn journey_summary(estimate: &JourneyEstimate) -> Result<String, askama::Error> {
    JourneySummaryTemplate::from_estimate(estimate).render()
}
