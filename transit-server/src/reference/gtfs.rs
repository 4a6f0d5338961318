//! Build reference artifacts from a static GTFS feed.
//!
//! Reads `stops.txt` and `routes.txt` and writes the minimal JSON the
//! repository serves. Runs offline; nothing here is on the request path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::GtfsBuildError;
use super::repository::{ROUTES_ARTIFACT, RouteRef, STOPS_ARTIFACT, StopRef};

/// A row of `stops.txt`. Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: String,
    stop_name: String,
    #[serde(default)]
    location_type: Option<String>,
}

impl StopRow {
    /// Stops (0) and stations (1); entrances, nodes and boarding areas are
    /// dropped.
    fn is_listed(&self) -> bool {
        matches!(self.location_type.as_deref(), None | Some("") | Some("0") | Some("1"))
    }
}

/// A row of `routes.txt`.
#[derive(Debug, Deserialize)]
struct RouteRow {
    route_id: String,
    #[serde(default)]
    route_short_name: Option<String>,
    #[serde(default)]
    route_long_name: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub stops_path: PathBuf,
    pub routes_path: PathBuf,
    pub stops_written: usize,
    pub routes_written: usize,
}

/// Build `stops_min.json` and `routes_min.json` in `out_dir` from the GTFS
/// files in `gtfs_dir`. The output directory is created if needed.
pub fn build_reference(gtfs_dir: &Path, out_dir: &Path) -> Result<BuildSummary, GtfsBuildError> {
    let stops_txt = gtfs_dir.join("stops.txt");
    let routes_txt = gtfs_dir.join("routes.txt");

    for input in [&stops_txt, &routes_txt] {
        if !input.is_file() {
            return Err(GtfsBuildError::MissingInput {
                path: input.display().to_string(),
            });
        }
    }

    let stops: Vec<StopRef> = read_rows::<StopRow>(&stops_txt)?
        .into_iter()
        .filter(StopRow::is_listed)
        .map(|row| StopRef {
            stop_id: row.stop_id,
            stop_name: row.stop_name,
        })
        .collect();

    let routes: Vec<RouteRef> = read_rows::<RouteRow>(&routes_txt)?
        .into_iter()
        .map(|row| RouteRef {
            route_id: row.route_id,
            route_short_name: non_empty(row.route_short_name),
            route_long_name: non_empty(row.route_long_name),
        })
        .collect();

    std::fs::create_dir_all(out_dir).map_err(|source| GtfsBuildError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;

    let stops_path = out_dir.join(STOPS_ARTIFACT);
    let routes_path = out_dir.join(ROUTES_ARTIFACT);
    write_pretty(&stops_path, &stops)?;
    write_pretty(&routes_path, &routes)?;

    info!(
        stops = stops.len(),
        routes = routes.len(),
        out_dir = %out_dir.display(),
        "built reference data"
    );

    Ok(BuildSummary {
        stops_path,
        routes_path,
        stops_written: stops.len(),
        routes_written: routes.len(),
    })
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, GtfsBuildError> {
    let csv_err = |source: csv::Error| GtfsBuildError::Csv {
        path: path.display().to_string(),
        source,
    };

    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    reader
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), GtfsBuildError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| GtfsBuildError::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| GtfsBuildError::Io {
        path: path.display().to_string(),
        source,
    })
}
