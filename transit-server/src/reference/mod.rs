//! Static reference data: stops and routes.
//!
//! Artifacts are produced offline from a GTFS feed by [`build_reference`]
//! and read back at runtime through [`ReferenceRepository`].

mod error;
mod gtfs;
mod repository;

pub use error::{GtfsBuildError, ReferenceError};
pub use gtfs::{BuildSummary, build_reference};
pub use repository::{ROUTES_ARTIFACT, ReferenceRepository, RouteRef, STOPS_ARTIFACT, StopRef};
