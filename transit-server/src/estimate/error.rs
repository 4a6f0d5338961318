//! Errors from journey estimation.

use crate::mbta::MbtaError;

/// Error from estimating a journey.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// The caller supplied inputs that violate a precondition.
    #[error("{0}")]
    Input(String),

    /// Live data was insufficient to produce an estimate.
    ///
    /// This is an expected outcome of real-time data, not a fault.
    #[error("{0}")]
    NotFound(String),

    /// The prediction source failed.
    #[error("prediction source failed: {0}")]
    Upstream(#[from] MbtaError),
}

impl EstimateError {
    /// Whether the error is the caller's fault or an expected data gap,
    /// as opposed to an upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EstimateError::Input(_) | EstimateError::NotFound(_))
    }
}
