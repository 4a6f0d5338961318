//! Application state for the web layer.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::estimate::EstimateConfig;
use crate::mbta::PredictionBackend;
use crate::reference::ReferenceRepository;
use crate::storage::ReferenceStorage;

/// Time zone requests are estimated in.
pub const SERVICE_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Real-time prediction source
    pub predictions: Arc<PredictionBackend>,

    /// Stops and routes lookup
    pub reference: Arc<ReferenceRepository<ReferenceStorage>>,

    /// Journey estimator configuration
    pub config: Arc<EstimateConfig>,

    /// Origins allowed by CORS
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        predictions: PredictionBackend,
        reference: ReferenceRepository<ReferenceStorage>,
        config: EstimateConfig,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            predictions: Arc::new(predictions),
            reference: Arc::new(reference),
            config: Arc::new(config),
            cors_origins: Arc::new(cors_origins),
        }
    }
}

/// The current instant in the service time zone.
pub fn service_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&SERVICE_TIMEZONE).fixed_offset()
}
