//! Journey estimation core.
//!
//! Answers "if I leave from this stop on this route now, when do I get
//! there, and how sure are we?"
//!
//! The pieces compose in one direction: [`JourneyEstimator`] picks a trip
//! from live predictions, [`EtaEstimator`] turns its timing into percentile
//! bands, and [`ReliabilityScorer`] explains how much to trust the result.

mod config;
mod error;
mod eta;
mod journey;
mod reliability;

pub use config::EstimateConfig;
pub use error::EstimateError;
pub use eta::{EtaEstimate, EtaEstimator};
pub use journey::{JourneyEstimate, JourneyEstimator};
pub use reliability::{ReliabilityReport, ReliabilityScorer};
