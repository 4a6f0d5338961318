//! Unit tests for journey orchestration.

use super::*;
use crate::mbta::{MbtaError, PredictionsDocument};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use std::sync::Mutex;

fn t0() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0)
        .unwrap()
        .fixed_offset()
}

fn at(mins: i64) -> DateTime<FixedOffset> {
    t0() + Duration::minutes(mins)
}

fn iso(mins: i64) -> String {
    at(mins).to_rfc3339()
}

fn record(stop: &str, trip: Option<&str>, arrival: Option<i64>, departure: Option<i64>) -> Value {
    json!({
        "attributes": {
            "arrival_time": arrival.map(iso),
            "departure_time": departure.map(iso),
        },
        "relationships": {
            "stop": {"data": {"id": stop}},
            "route": {"data": {"id": "Red"}},
            "trip": {"data": trip.map(|t| json!({"id": t}))},
        }
    })
}

/// Origin record departing `mins` after t0.
fn departs(trip: &str, mins: i64) -> Value {
    record("origin", Some(trip), None, Some(mins))
}

/// Destination record arriving `mins` after t0.
fn arrives(trip: &str, mins: i64) -> Value {
    record("destination", Some(trip), Some(mins), None)
}

fn doc(records: Vec<Value>) -> PredictionsDocument {
    serde_json::from_value(json!({ "data": records })).unwrap()
}

/// Prediction source that records every query it receives.
struct RecordingSource {
    documents: HashMap<String, PredictionsDocument>,
    failing_stop: Option<String>,
    calls: Mutex<Vec<PredictionQuery>>,
}

impl RecordingSource {
    fn new() -> Self {
        Self {
            documents: HashMap::new(),
            failing_stop: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_stop(mut self, stop: &str, records: Vec<Value>) -> Self {
        self.documents.insert(stop.to_string(), doc(records));
        self
    }

    fn failing_at(mut self, stop: &str) -> Self {
        self.failing_stop = Some(stop.to_string());
        self
    }

    fn calls(&self) -> Vec<PredictionQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn stops_fetched(&self) -> Vec<String> {
        self.calls().into_iter().map(|q| q.stop_id).collect()
    }
}

impl PredictionSource for RecordingSource {
    async fn fetch_predictions(
        &self,
        query: &PredictionQuery,
    ) -> Result<PredictionsDocument, MbtaError> {
        self.calls.lock().unwrap().push(query.clone());
        if self.failing_stop.as_deref() == Some(query.stop_id.as_str()) {
            return Err(MbtaError::RateLimited);
        }
        Ok(self
            .documents
            .get(&query.stop_id)
            .cloned()
            .unwrap_or_default())
    }
}

async fn run(source: &RecordingSource) -> Result<JourneyEstimate, EstimateError> {
    JourneyEstimator::new(source, EstimateConfig::default())
        .estimate_journey("origin", "destination", "Red", t0())
        .await
}

#[tokio::test]
async fn end_to_end_infrequent_service() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5), departs("trip-2", 17)])
        .with_stop("destination", vec![arrives("trip-1", 25)]);

    let result = run(&source).await.unwrap();

    assert_eq!(result.trip_id, "trip-1");
    assert_eq!(result.origin_stop_id, "origin");
    assert_eq!(result.destination_stop_id, "destination");
    assert_eq!(result.route_id, "Red");
    assert_eq!(result.generated_at, t0());

    assert_eq!(result.eta.depart_time, at(5));
    assert_eq!(result.eta.p50_arrival, at(25));
    assert_eq!(result.eta.headway_seconds, Some(720));
    assert!(result.eta.p80_arrival >= result.eta.p50_arrival);
    assert!(result.eta.p90_arrival >= result.eta.p80_arrival);
    assert!(result.eta.explanation.contains("less frequent"));

    // 720s falls in the [600, 900) bucket; headway was measured so no
    // default-headway penalty.
    assert_eq!(result.reliability.score, 70);
    assert_eq!(result.reliability.reasons.len(), 1);
}

#[tokio::test]
async fn queries_origin_then_destination() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5)])
        .with_stop("destination", vec![arrives("trip-1", 25)]);

    run(&source).await.unwrap();

    let calls = source.calls();
    assert_eq!(calls.len(), 2);

    assert_eq!(
        calls[0],
        PredictionQuery::new("origin", 5)
            .with_route("Red")
            .sorted_by(SORT_BY_DEPARTURE)
    );
    assert_eq!(calls[1], PredictionQuery::new("destination", 25).with_route("Red"));
}

#[tokio::test]
async fn no_destination_match_is_not_found() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5), departs("trip-2", 17)])
        .with_stop("destination", vec![arrives("trip-9", 25)]);

    let err = run(&source).await.unwrap_err();

    assert!(matches!(err, EstimateError::NotFound(_)), "{err:?}");
    assert!(err.to_string().contains("no destination match"));
}

#[tokio::test]
async fn empty_origin_fails_before_destination_fetch() {
    let source = RecordingSource::new().with_stop("destination", vec![arrives("trip-1", 25)]);

    let err = run(&source).await.unwrap_err();

    assert!(matches!(err, EstimateError::NotFound(_)), "{err:?}");
    assert!(err.to_string().contains("no usable origin departures"));
    assert_eq!(source.stops_fetched(), ["origin"]);
}

#[tokio::test]
async fn origin_without_departure_times_is_not_found() {
    let source = RecordingSource::new()
        .with_stop(
            "origin",
            vec![
                record("origin", Some("trip-1"), Some(5), None),
                record("origin", Some("trip-2"), None, None),
            ],
        )
        .with_stop("destination", vec![arrives("trip-1", 25)]);

    let err = run(&source).await.unwrap_err();

    assert!(matches!(err, EstimateError::NotFound(_)));
    assert_eq!(source.stops_fetched(), ["origin"]);
}

#[tokio::test]
async fn earliest_destination_time_wins() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5)])
        .with_stop(
            "destination",
            vec![
                arrives("trip-1", 30),
                arrives("trip-1", 25),
                arrives("trip-1", 28),
            ],
        );

    let result = run(&source).await.unwrap();
    assert_eq!(result.eta.p50_arrival, at(25));
}

#[tokio::test]
async fn destination_departure_is_fallback() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5)])
        .with_stop(
            "destination",
            vec![record("destination", Some("trip-1"), None, Some(26))],
        );

    let result = run(&source).await.unwrap();
    assert_eq!(result.eta.p50_arrival, at(26));
}

#[tokio::test]
async fn skips_unmatched_departures() {
    // trip-0 leaves first but never shows up at the destination.
    let source = RecordingSource::new()
        .with_stop(
            "origin",
            vec![
                departs("trip-0", 2),
                departs("trip-1", 5),
                departs("trip-2", 11),
            ],
        )
        .with_stop(
            "destination",
            vec![arrives("trip-1", 25), arrives("trip-2", 31)],
        );

    let result = run(&source).await.unwrap();

    assert_eq!(result.trip_id, "trip-1");
    assert_eq!(result.eta.depart_time, at(5));
    assert_eq!(result.eta.headway_seconds, Some(360));
}

#[tokio::test]
async fn headway_uses_next_departure_of_any_trip() {
    // The next departure's trip is unknown at the destination and even
    // lacks a trip ID; it still sets the headway.
    let source = RecordingSource::new()
        .with_stop(
            "origin",
            vec![
                departs("trip-1", 5),
                record("origin", None, None, Some(9)),
            ],
        )
        .with_stop("destination", vec![arrives("trip-1", 25)]);

    let result = run(&source).await.unwrap();

    assert_eq!(result.eta.headway_seconds, Some(240));
    assert_eq!(result.reliability.score, 100);
}

#[tokio::test]
async fn origin_is_resorted_by_departure() {
    let source = RecordingSource::new()
        .with_stop(
            "origin",
            vec![departs("trip-2", 17), departs("trip-1", 5)],
        )
        .with_stop(
            "destination",
            vec![arrives("trip-2", 37), arrives("trip-1", 25)],
        );

    let result = run(&source).await.unwrap();

    assert_eq!(result.trip_id, "trip-1");
    assert_eq!(result.eta.headway_seconds, Some(720));
}

#[tokio::test]
async fn single_departure_uses_default_headway() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5)])
        .with_stop("destination", vec![arrives("trip-1", 25)]);

    let result = run(&source).await.unwrap();

    assert_eq!(result.eta.headway_seconds, None);
    // 100 - 25 (unknown headway) - 10 (default used)
    assert_eq!(result.reliability.score, 65);
    assert_eq!(result.reliability.reasons.len(), 2);
}

#[tokio::test]
async fn destination_before_departure_is_input_error() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5)])
        .with_stop("destination", vec![arrives("trip-1", 1)]);

    let err = run(&source).await.unwrap_err();
    assert!(matches!(err, EstimateError::Input(_)), "{err:?}");
}

#[tokio::test]
async fn origin_failure_is_upstream() {
    let source = RecordingSource::new().failing_at("origin");

    let err = run(&source).await.unwrap_err();

    assert!(matches!(err, EstimateError::Upstream(MbtaError::RateLimited)));
    assert_eq!(source.stops_fetched(), ["origin"]);
}

#[tokio::test]
async fn destination_failure_is_upstream() {
    let source = RecordingSource::new()
        .with_stop("origin", vec![departs("trip-1", 5)])
        .failing_at("destination");

    let err = run(&source).await.unwrap_err();

    assert!(matches!(err, EstimateError::Upstream(_)));
    assert_eq!(source.stops_fetched(), ["origin", "destination"]);
}

#[test]
fn destination_times_skip_incomplete_records() {
    let preds = vec![
        Prediction::new("d").with_arrival(at(20)),
        Prediction::new("d").with_trip("trip-1"),
        Prediction::new("d").with_trip("trip-2").with_arrival(at(22)),
        Prediction::new("d")
            .with_trip("trip-2")
            .with_departure(at(21)),
    ];

    let times = destination_times(&preds);

    assert_eq!(times.len(), 1);
    assert_eq!(times["trip-2"], at(21));
}

#[test]
fn select_trip_returns_none_without_match() {
    let departures = upcoming_departures(vec![
        Prediction::new("o").with_trip("a").with_departure(at(1)),
        Prediction::new("o").with_departure(at(2)),
    ]);
    assert!(select_trip(&departures, &HashMap::new()).is_none());
}

#[test]
fn last_departure_has_no_next() {
    let departures = upcoming_departures(vec![
        Prediction::new("o").with_trip("a").with_departure(at(1)),
        Prediction::new("o").with_trip("b").with_departure(at(4)),
    ]);
    let arrivals = HashMap::from([("b", at(10))]);

    let choice = select_trip(&departures, &arrivals).unwrap();
    assert_eq!(choice.trip_id, "b");
    assert_eq!(choice.next_departure, None);
}
