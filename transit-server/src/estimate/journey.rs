//! Journey orchestration: from live predictions to an explained estimate.
//!
//! The origin stop is queried first. Its upcoming departures are matched by
//! trip ID against predictions at the destination, and the first departure
//! whose trip is seen at the destination is the one we estimate for.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Prediction, serialize_instant};
use crate::mbta::{PredictionQuery, PredictionSource, SORT_BY_DEPARTURE, normalize};

use super::config::EstimateConfig;
use super::error::EstimateError;
use super::eta::{EtaEstimate, EtaEstimator};
use super::reliability::{ReliabilityReport, ReliabilityScorer};

/// End-to-end estimate for one origin/destination pair on a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyEstimate {
    pub origin_stop_id: String,
    pub destination_stop_id: String,
    pub route_id: String,

    /// Trip chosen for the journey.
    pub trip_id: String,

    pub eta: EtaEstimate,
    pub reliability: ReliabilityReport,

    /// The `now` the estimate was made for.
    #[serde(serialize_with = "serialize_instant")]
    pub generated_at: DateTime<FixedOffset>,
}

/// Estimates journeys from a [`PredictionSource`].
///
/// Holds no mutable state; one estimator can serve any number of requests.
#[derive(Debug, Clone)]
pub struct JourneyEstimator<'a, P> {
    source: &'a P,
    config: EstimateConfig,
    eta: EtaEstimator,
    reliability: ReliabilityScorer,
}

impl<'a, P: PredictionSource + Sync> JourneyEstimator<'a, P> {
    /// Create an estimator over `source`.
    pub fn new(source: &'a P, config: EstimateConfig) -> Self {
        let eta = EtaEstimator::new(&config);
        Self {
            source,
            config,
            eta,
            reliability: ReliabilityScorer::new(),
        }
    }

    /// Estimate a journey departing after `now`.
    ///
    /// # Errors
    ///
    /// - [`EstimateError::NotFound`] if the origin has no usable departures,
    ///   or none of them is matched at the destination
    /// - [`EstimateError::Upstream`] if a prediction fetch fails
    /// - [`EstimateError::Input`] if the matched timing is inconsistent
    #[tracing::instrument(skip(self, now))]
    pub async fn estimate_journey(
        &self,
        origin_stop_id: &str,
        destination_stop_id: &str,
        route_id: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<JourneyEstimate, EstimateError> {
        let origin_query = PredictionQuery::new(origin_stop_id, self.config.origin_limit)
            .with_route(route_id)
            .sorted_by(SORT_BY_DEPARTURE);
        let origin_doc = self.source.fetch_predictions(&origin_query).await?;

        let departures = upcoming_departures(normalize(&origin_doc));
        if departures.is_empty() {
            info!("no usable origin departures");
            return Err(EstimateError::NotFound(format!(
                "no usable origin departures at {origin_stop_id} on route {route_id}"
            )));
        }

        let destination_query =
            PredictionQuery::new(destination_stop_id, self.config.destination_limit)
                .with_route(route_id);
        let destination_doc = self.source.fetch_predictions(&destination_query).await?;
        let destination = normalize(&destination_doc);
        let arrivals = destination_times(&destination);

        let Some(choice) = select_trip(&departures, &arrivals) else {
            info!(
                departures = departures.len(),
                destination_trips = arrivals.len(),
                "no destination match"
            );
            return Err(EstimateError::NotFound(format!(
                "no destination match at {destination_stop_id} for any upcoming departure from {origin_stop_id}"
            )));
        };

        debug!(
            trip = choice.trip_id,
            depart = %choice.departure,
            arrive = %choice.arrival,
            "selected trip"
        );

        let eta = self.eta.estimate(
            now,
            choice.departure,
            choice.arrival,
            choice.next_departure,
            1.0,
        )?;

        let reliability = self
            .reliability
            .score(eta.headway_seconds, eta.headway_seconds.is_none(), true);

        Ok(JourneyEstimate {
            origin_stop_id: origin_stop_id.to_string(),
            destination_stop_id: destination_stop_id.to_string(),
            route_id: route_id.to_string(),
            trip_id: choice.trip_id.to_string(),
            eta,
            reliability,
            generated_at: now,
        })
    }
}

/// A departure paired with its destination time.
#[derive(Debug, Clone, PartialEq)]
struct TripChoice<'a> {
    trip_id: &'a str,
    departure: DateTime<FixedOffset>,
    arrival: DateTime<FixedOffset>,
    next_departure: Option<DateTime<FixedOffset>>,
}

/// A departing prediction with its departure time unwrapped.
#[derive(Debug, Clone)]
struct Departure {
    trip_id: Option<String>,
    at: DateTime<FixedOffset>,
}

/// Keep predictions with a departure time, stably sorted by it.
fn upcoming_departures(predictions: Vec<Prediction>) -> Vec<Departure> {
    let mut departures: Vec<Departure> = predictions
        .into_iter()
        .filter_map(|p| {
            Some(Departure {
                at: p.departure_time?,
                trip_id: p.trip_id,
            })
        })
        .collect();
    departures.sort_by_key(|d| d.at);
    departures
}

/// Map each trip seen at the destination to its earliest known time,
/// preferring arrival over departure per record.
fn destination_times(predictions: &[Prediction]) -> HashMap<&str, DateTime<FixedOffset>> {
    let mut times: HashMap<&str, DateTime<FixedOffset>> = HashMap::new();

    for p in predictions {
        let (Some(trip), Some(at)) = (p.trip_id.as_deref(), p.best_arrival()) else {
            continue;
        };
        times
            .entry(trip)
            .and_modify(|existing| {
                if at < *existing {
                    *existing = at;
                }
            })
            .or_insert(at);
    }

    times
}

/// First departure whose trip reaches the destination.
///
/// Headway is measured to the next departure in the list, whatever its
/// trip: it approximates service frequency, not this trip.
fn select_trip<'a>(
    departures: &'a [Departure],
    arrivals: &HashMap<&str, DateTime<FixedOffset>>,
) -> Option<TripChoice<'a>> {
    departures.iter().enumerate().find_map(|(idx, d)| {
        let trip_id = d.trip_id.as_deref()?;
        let arrival = *arrivals.get(trip_id)?;
        Some(TripChoice {
            trip_id,
            departure: d.at,
            arrival,
            next_departure: departures.get(idx + 1).map(|next| next.at),
        })
    })
}

#[cfg(test)]
#[path = "journey_tests.rs"]
mod tests;
