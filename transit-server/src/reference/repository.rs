//! Stops and routes lookup over blob storage.
//!
//! Artifacts are immutable once published, so parsed lists are cached in
//! memory. The TTL only bounds how long a republished artifact goes unseen.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::BlobStorage;

use super::error::ReferenceError;

/// Object key of the stops artifact.
pub const STOPS_ARTIFACT: &str = "stops_min.json";

/// Object key of the routes artifact.
pub const ROUTES_ARTIFACT: &str = "routes_min.json";

/// A stop from the static feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRef {
    pub stop_id: String,
    pub stop_name: String,
}

/// A route from the static feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRef {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
}

/// How long a parsed artifact is served before storage is re-read.
const REFERENCE_TTL: Duration = Duration::from_secs(60 * 60);

/// Read-only repository of reference data.
pub struct ReferenceRepository<S> {
    storage: S,
    stops: MokaCache<&'static str, Arc<Vec<StopRef>>>,
    routes: MokaCache<&'static str, Arc<Vec<RouteRef>>>,
}

impl<S: BlobStorage + Sync> ReferenceRepository<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            stops: MokaCache::builder().time_to_live(REFERENCE_TTL).build(),
            routes: MokaCache::builder().time_to_live(REFERENCE_TTL).build(),
        }
    }

    /// All stops.
    pub async fn list_stops(&self) -> Result<Arc<Vec<StopRef>>, ReferenceError> {
        load_cached(&self.storage, &self.stops, STOPS_ARTIFACT).await
    }

    /// All routes.
    pub async fn list_routes(&self) -> Result<Arc<Vec<RouteRef>>, ReferenceError> {
        load_cached(&self.storage, &self.routes, ROUTES_ARTIFACT).await
    }
}

async fn load_cached<S, T>(
    storage: &S,
    cache: &MokaCache<&'static str, Arc<Vec<T>>>,
    artifact: &'static str,
) -> Result<Arc<Vec<T>>, ReferenceError>
where
    S: BlobStorage + Sync,
    T: DeserializeOwned + Send + Sync + 'static,
{
    if let Some(cached) = cache.get(&artifact).await {
        debug!(artifact, "reference cache hit");
        return Ok(cached);
    }

    let bytes = storage.read_bytes(artifact).await?;
    let parsed: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| ReferenceError::Json {
        artifact: artifact.to_string(),
        message: e.to_string(),
    })?;

    debug!(artifact, entries = parsed.len(), "loaded reference artifact");
    let entry = Arc::new(parsed);
    cache.insert(artifact, Arc::clone(&entry)).await;
    Ok(entry)
}
