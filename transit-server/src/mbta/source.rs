//! The prediction-fetching seam between the estimator and providers.

use std::future::Future;

use super::error::MbtaError;
use super::types::PredictionsDocument;

/// Sort key for departure-ordered results.
pub const SORT_BY_DEPARTURE: &str = "departure_time";

/// Filters for a predictions request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionQuery {
    /// Stop to fetch predictions for.
    pub stop_id: String,

    /// Optional route filter.
    pub route_id: Option<String>,

    /// Optional direction filter.
    pub direction_id: Option<i64>,

    /// Maximum number of records to return.
    pub limit: usize,

    /// Optional sort key (e.g. "departure_time").
    pub sort: Option<String>,
}

impl PredictionQuery {
    /// Create a query for a stop with the given record limit.
    pub fn new(stop_id: impl Into<String>, limit: usize) -> Self {
        Self {
            stop_id: stop_id.into(),
            route_id: None,
            direction_id: None,
            limit,
            sort: None,
        }
    }

    /// Filter by route.
    pub fn with_route(mut self, route_id: impl Into<String>) -> Self {
        self.route_id = Some(route_id.into());
        self
    }

    /// Filter by direction.
    pub fn with_direction(mut self, direction_id: i64) -> Self {
        self.direction_id = Some(direction_id);
        self
    }

    /// Request a sort order.
    pub fn sorted_by(mut self, key: impl Into<String>) -> Self {
        self.sort = Some(key.into());
        self
    }

    /// Query-string parameters for the MBTA v3 API.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("filter[stop]", self.stop_id.clone()),
            ("page[limit]", self.limit.to_string()),
        ];
        if let Some(route) = &self.route_id {
            params.push(("filter[route]", route.clone()));
        }
        if let Some(direction) = self.direction_id {
            params.push(("filter[direction_id]", direction.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

/// Something that can fetch raw predictions for a stop.
///
/// This abstraction lets the journey estimator run against the live API,
/// file-backed mock data, or a test double.
pub trait PredictionSource {
    /// Fetch predictions matching `query`.
    ///
    /// Transport failures, non-success statuses and non-JSON bodies are
    /// errors; callers treat them as fatal for the request.
    fn fetch_predictions(
        &self,
        query: &PredictionQuery,
    ) -> impl Future<Output = Result<PredictionsDocument, MbtaError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_params() {
        let q = PredictionQuery::new("place-davis", 25);
        assert_eq!(
            q.to_params(),
            vec![
                ("filter[stop]", "place-davis".to_string()),
                ("page[limit]", "25".to_string()),
            ]
        );
    }

    #[test]
    fn full_params() {
        let q = PredictionQuery::new("place-davis", 5)
            .with_route("Red")
            .with_direction(0)
            .sorted_by(SORT_BY_DEPARTURE);

        let params = q.to_params();
        assert!(params.contains(&("filter[route]", "Red".to_string())));
        assert!(params.contains(&("filter[direction_id]", "0".to_string())));
        assert!(params.contains(&("sort", "departure_time".to_string())));
        assert!(params.contains(&("page[limit]", "5".to_string())));
    }
}
