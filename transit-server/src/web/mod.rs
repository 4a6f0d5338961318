//! Web layer for the journey estimator.
//!
//! Provides HTTP endpoints for estimating journeys and listing reference
//! data.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, SERVICE_TIMEZONE, service_now};
pub use templates::journey_summary;
