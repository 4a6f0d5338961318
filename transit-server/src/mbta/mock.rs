//! Mock prediction source for running without API access.
//!
//! Loads sample predictions documents from JSON files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::error::MbtaError;
use super::source::{PredictionQuery, PredictionSource};
use super::types::PredictionsDocument;

/// Mock client that serves predictions from JSON files.
///
/// Documents are keyed by stop ID. A stop with no file has no predictions,
/// which is what the live API reports for a quiet stop.
#[derive(Debug, Clone, Default)]
pub struct MockMbtaClient {
    documents: Arc<HashMap<String, PredictionsDocument>>,
}

impl MockMbtaClient {
    /// Load documents from a directory.
    ///
    /// Expects files named `{stop_id}.json` (e.g. `place-davis.json`).
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, MbtaError> {
        let data_dir = data_dir.as_ref();
        let mut documents = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            MbtaError::NotConfigured(format!(
                "failed to read mock data directory {}: {e}",
                data_dir.display()
            ))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| MbtaError::NotConfigured(format!("failed to read entry: {e}")))?
                .path();

            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(stop_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let json = std::fs::read_to_string(&path).map_err(|e| {
                MbtaError::NotConfigured(format!("failed to read {}: {e}", path.display()))
            })?;

            let doc: PredictionsDocument =
                serde_json::from_str(&json).map_err(|e| MbtaError::Json {
                    message: format!("{}: {e}", path.display()),
                    body: None,
                })?;

            documents.insert(stop_id.to_string(), doc);
        }

        if documents.is_empty() {
            return Err(MbtaError::NotConfigured(format!(
                "no mock prediction files found in {}",
                data_dir.display()
            )));
        }

        let client = Self::from_documents(documents);
        info!(
            dir = %data_dir.display(),
            stops = ?client.available_stops(),
            "loaded mock predictions"
        );
        Ok(client)
    }

    /// Build a mock from in-memory documents keyed by stop ID.
    pub fn from_documents(documents: HashMap<String, PredictionsDocument>) -> Self {
        Self {
            documents: Arc::new(documents),
        }
    }

    /// Stops that have mock data, sorted.
    pub fn available_stops(&self) -> Vec<String> {
        let mut stops: Vec<_> = self.documents.keys().cloned().collect();
        stops.sort();
        stops
    }

    /// Serve the document for the query's stop.
    ///
    /// Only `limit` is honoured; route, direction and sort are ignored
    /// because mock files are already written for one route.
    pub fn get_predictions(&self, query: &PredictionQuery) -> PredictionsDocument {
        let Some(doc) = self.documents.get(&query.stop_id) else {
            debug!(stop = %query.stop_id, "no mock predictions for stop");
            return PredictionsDocument::default();
        };

        PredictionsDocument {
            data: doc.data.iter().take(query.limit).cloned().collect(),
        }
    }
}

impl PredictionSource for MockMbtaClient {
    async fn fetch_predictions(
        &self,
        query: &PredictionQuery,
    ) -> Result<PredictionsDocument, MbtaError> {
        Ok(self.get_predictions(query))
    }
}
