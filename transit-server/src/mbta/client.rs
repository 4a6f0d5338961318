//! MBTA v3 HTTP client.
//!
//! Performs the HTTP request and hands back the raw predictions document.
//! Conversion to domain types happens in [`super::convert`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use super::error::MbtaError;
use super::source::{PredictionQuery, PredictionSource};
use super::types::PredictionsDocument;

/// Default base URL for the MBTA v3 API.
pub const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest body excerpt kept in error messages.
const ERROR_BODY_LIMIT: usize = 500;

/// Configuration for the MBTA client.
#[derive(Debug, Clone)]
pub struct MbtaConfig {
    /// Optional API key (anonymous access is rate limited harder)
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl MbtaConfig {
    /// Create a config for the production API without an API key.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for MbtaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the predictions endpoint URL from a base URL.
pub fn predictions_url(base_url: &str) -> String {
    format!("{}/predictions", base_url.trim_end_matches('/'))
}

/// MBTA v3 API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct MbtaClient {
    http: reqwest::Client,
    predictions_url: String,
    semaphore: Arc<Semaphore>,
}

impl MbtaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MbtaConfig) -> Result<Self, MbtaError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|_| MbtaError::NotConfigured("invalid API key format".to_string()))?;
            headers.insert("x-api-key", value);
        }

        if config.max_concurrent == 0 {
            return Err(MbtaError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            predictions_url: predictions_url(&config.base_url),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch the raw predictions document for a query.
    #[tracing::instrument(skip(self, query), fields(stop = %query.stop_id, limit = query.limit))]
    pub async fn get_predictions(
        &self,
        query: &PredictionQuery,
    ) -> Result<PredictionsDocument, MbtaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MbtaError::NotConfigured("request semaphore closed".to_string()))?;

        let response = self
            .http
            .get(&self.predictions_url)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MbtaError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MbtaError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MbtaError::ApiError {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        let body = response.text().await?;

        let doc: PredictionsDocument =
            serde_json::from_str(&body).map_err(|e| MbtaError::Json {
                message: e.to_string(),
                body: Some(excerpt(&body)),
            })?;

        debug!(records = doc.len(), "fetched predictions");
        Ok(doc)
    }
}

impl PredictionSource for MbtaClient {
    async fn fetch_predictions(
        &self,
        query: &PredictionQuery,
    ) -> Result<PredictionsDocument, MbtaError> {
        self.get_predictions(query).await
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
