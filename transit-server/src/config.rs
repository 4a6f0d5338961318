//! Runtime settings read from the environment.
//!
//! Recognised variables:
//! - `MBTA_BASE_URL`, `MBTA_API_KEY`, `HTTP_TIMEOUT_S`
//! - `REFERENCE_BACKEND` (`local` or `s3`), `REFERENCE_DIR`,
//!   `REFERENCE_S3_BUCKET`, `REFERENCE_S3_PREFIX`
//! - `MOCK_PREDICTIONS_DIR`
//! - `BIND_ADDR`, `CORS_ORIGINS`
//!
//! Blank values are treated as unset.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::mbta::{
    DEFAULT_BASE_URL, MbtaClient, MbtaConfig, MbtaError, MockMbtaClient, PredictionBackend,
};
use crate::storage::StorageConfig;

const DEFAULT_REFERENCE_DIR: &str = "data/reference";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_CORS_ORIGINS: &str = "http://127.0.0.1:5173,http://localhost:5173";
const DEFAULT_TIMEOUT_S: f64 = 10.0;

/// Errors in runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable has an unusable value
    #[error("{var} is invalid ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// MBTA API client configuration
    pub mbta: MbtaConfig,

    /// Where reference artifacts are read from
    pub storage: StorageConfig,

    /// Serve predictions from JSON files in this directory instead of the API
    pub mock_predictions_dir: Option<PathBuf>,

    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut mbta = MbtaConfig::new()
            .with_base_url(get("MBTA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
            .with_timeout(parse_timeout(get("HTTP_TIMEOUT_S"))?);
        if let Some(key) = get("MBTA_API_KEY") {
            mbta = mbta.with_api_key(key);
        }

        let backend = get("REFERENCE_BACKEND").unwrap_or_else(|| "local".to_string());
        let storage = match backend.to_ascii_lowercase().as_str() {
            "local" => StorageConfig::Local {
                dir: PathBuf::from(
                    get("REFERENCE_DIR").unwrap_or_else(|| DEFAULT_REFERENCE_DIR.to_string()),
                ),
            },
            "s3" => StorageConfig::S3 {
                bucket: get("REFERENCE_S3_BUCKET")
                    .ok_or(ConfigError::Missing("REFERENCE_S3_BUCKET"))?,
                prefix: get("REFERENCE_S3_PREFIX").unwrap_or_default(),
            },
            _ => {
                return Err(ConfigError::Invalid {
                    var: "REFERENCE_BACKEND",
                    value: backend,
                    reason: "expected \"local\" or \"s3\"".to_string(),
                });
            }
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            mbta,
            storage,
            mock_predictions_dir: get("MOCK_PREDICTIONS_DIR").map(PathBuf::from),
            bind_addr,
            cors_origins,
        })
    }

    /// Build the prediction source these settings select.
    pub fn prediction_backend(&self) -> Result<PredictionBackend, MbtaError> {
        match &self.mock_predictions_dir {
            Some(dir) => Ok(PredictionBackend::Mock(MockMbtaClient::new(dir)?)),
            None => Ok(PredictionBackend::Live(MbtaClient::new(self.mbta.clone())?)),
        }
    }
}

fn parse_timeout(raw: Option<String>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs_f64(DEFAULT_TIMEOUT_S));
    };

    let invalid = |reason: &str| ConfigError::Invalid {
        var: "HTTP_TIMEOUT_S",
        value: raw.clone(),
        reason: reason.to_string(),
    };

    let secs: f64 = raw.parse().map_err(|_| invalid("must be a number"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid("must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid("out of range"))
}
