//! Reference data error types.

use crate::storage::StorageError;

/// Errors from loading reference data.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// Artifact could not be read
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Artifact was not the expected JSON
    #[error("failed to parse {artifact}: {message}")]
    Json { artifact: String, message: String },
}

/// Errors from building reference artifacts from a GTFS feed.
#[derive(Debug, thiserror::Error)]
pub enum GtfsBuildError {
    /// A required GTFS file is missing
    #[error("missing GTFS input: {path}")]
    MissingInput { path: String },

    /// A GTFS file could not be parsed
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Output could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialized
    #[error("failed to serialize {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
