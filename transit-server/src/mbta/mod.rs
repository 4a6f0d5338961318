//! MBTA v3 predictions provider.
//!
//! This module fetches raw real-time predictions and normalizes them into
//! [`crate::domain::Prediction`] values.
//!
//! Key characteristics of the predictions endpoint:
//! - Responses are JSON:API documents; stop, route and trip IDs live under
//!   `relationships`, times and direction under `attributes`
//! - Times are ISO-8601 with an explicit offset (local Boston time)
//! - Any field may be missing or null, so normalization is per-field lenient

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, MbtaClient, MbtaConfig, predictions_url};
pub use convert::{normalize, normalize_record};
pub use error::MbtaError;
pub use mock::MockMbtaClient;
pub use source::{PredictionQuery, PredictionSource, SORT_BY_DEPARTURE};
pub use types::{
    PredictionAttributes, PredictionRelationships, PredictionResource, PredictionsDocument,
    Relationship,
};

/// The prediction source chosen at startup.
#[derive(Debug, Clone)]
pub enum PredictionBackend {
    /// Live MBTA v3 API.
    Live(MbtaClient),
    /// File-backed sample data.
    Mock(MockMbtaClient),
}

impl PredictionSource for PredictionBackend {
    async fn fetch_predictions(
        &self,
        query: &PredictionQuery,
    ) -> Result<PredictionsDocument, MbtaError> {
        match self {
            PredictionBackend::Live(client) => client.get_predictions(query).await,
            PredictionBackend::Mock(client) => Ok(client.get_predictions(query)),
        }
    }
}
