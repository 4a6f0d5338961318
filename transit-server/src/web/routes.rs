//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::estimate::{EstimateError, JourneyEstimator};
use crate::reference::ReferenceError;

use super::dto::*;
use super::state::{AppState, service_now};
use super::templates::journey_summary;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/estimate", post(estimate))
        .route("/api/stops", get(list_stops))
        .route("/api/routes", get(list_routes))
        .layer(cors)
        .with_state(state)
}

/// CORS for the local front-end. Origins that are not valid header values
/// are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Estimate a journey from live predictions.
async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<JourneyEstimateResponse>, AppError> {
    for (field, value) in [
        ("origin_stop_id", &req.origin_stop_id),
        ("destination_stop_id", &req.destination_stop_id),
        ("route_id", &req.route_id),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest {
                message: format!("{field} must not be empty"),
            });
        }
    }

    let estimator = JourneyEstimator::new(state.predictions.as_ref(), (*state.config).clone());
    let result = estimator
        .estimate_journey(
            &req.origin_stop_id,
            &req.destination_stop_id,
            &req.route_id,
            service_now(),
        )
        .await?;

    let summary = journey_summary(&result).map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;

    info!(
        origin = %result.origin_stop_id,
        destination = %result.destination_stop_id,
        trip = %result.trip_id,
        score = result.reliability.score,
        "estimated journey"
    );

    Ok(Json(JourneyEstimateResponse::from_estimate(&result, summary)))
}

/// List all stops.
async fn list_stops(State(state): State<AppState>) -> Result<Json<Vec<StopResult>>, AppError> {
    let stops = state.reference.list_stops().await?;
    Ok(Json(stops.iter().map(StopResult::from).collect()))
}

/// List all routes.
async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteResult>>, AppError> {
    let routes = state.reference.list_routes().await?;
    Ok(Json(routes.iter().map(RouteResult::from).collect()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<EstimateError> for AppError {
    fn from(e: EstimateError) -> Self {
        let message = e.to_string();
        if e.is_client_error() {
            AppError::BadRequest { message }
        } else {
            AppError::BadGateway { message }
        }
    }
}

impl From<ReferenceError> for AppError {
    fn from(e: ReferenceError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                info!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::BadGateway { message } => {
                warn!(%message, "upstream failure");
                (StatusCode::BAD_GATEWAY, message)
            }
            AppError::Internal { message } => {
                error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
