//! Read-only blob storage for reference artifacts.
//!
//! Reference data is built offline and published either to a local
//! directory or to an S3 bucket. Readers only need "give me the bytes
//! for this key", which is what [`BlobStorage`] provides.

mod error;
mod local;
mod s3;

use std::future::Future;
use std::path::PathBuf;

pub use error::StorageError;
pub use local::LocalBlobStorage;
pub use s3::{S3BlobStorage, object_key};

/// Something that can read whole objects by key.
pub trait BlobStorage {
    /// Read the object stored at `key`.
    fn read_bytes(&self, key: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;
}

/// Where reference artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// A directory on the local filesystem.
    Local { dir: PathBuf },
    /// An S3 bucket, optionally under a key prefix.
    S3 { bucket: String, prefix: String },
}

impl StorageConfig {
    /// Build the configured backend.
    ///
    /// S3 credentials and region come from the standard AWS environment.
    pub async fn connect(&self) -> ReferenceStorage {
        match self {
            StorageConfig::Local { dir } => ReferenceStorage::Local(LocalBlobStorage::new(dir)),
            StorageConfig::S3 { bucket, prefix } => {
                ReferenceStorage::S3(S3BlobStorage::from_env(bucket, prefix).await)
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            dir: PathBuf::from("data/reference"),
        }
    }
}

impl std::fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageConfig::Local { dir } => write!(f, "local:{}", dir.display()),
            StorageConfig::S3 { bucket, prefix } if prefix.is_empty() => {
                write!(f, "s3://{bucket}")
            }
            StorageConfig::S3 { bucket, prefix } => write!(f, "s3://{bucket}/{prefix}"),
        }
    }
}

/// The storage backend chosen at startup.
#[derive(Debug, Clone)]
pub enum ReferenceStorage {
    Local(LocalBlobStorage),
    S3(S3BlobStorage),
}

impl BlobStorage for ReferenceStorage {
    async fn read_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            ReferenceStorage::Local(storage) => storage.read_bytes(key).await,
            ReferenceStorage::S3(storage) => storage.read_bytes(key).await,
        }
    }
}
