//! Storage errors.

/// Error reading from blob storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object at this key
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// Key would escape the storage root
    #[error("invalid object key: {key}")]
    InvalidKey { key: String },

    /// Local filesystem failure
    #[error("failed to read {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// S3 request failure
    #[error("S3 error reading {key}: {message}")]
    S3 { key: String, message: String },
}
