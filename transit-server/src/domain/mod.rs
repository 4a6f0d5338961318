//! Domain types for the journey estimator.
//!
//! These are the provider-independent values the estimation core works
//! with. Provider payloads are converted into them at the edge (see
//! [`crate::mbta`]) and nothing downstream sees raw JSON.

mod prediction;
mod time;

pub use prediction::Prediction;
pub use time::{TimeError, format_hhmm_utc, format_instant, parse_instant, serialize_instant};
