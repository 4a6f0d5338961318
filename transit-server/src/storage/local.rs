//! Filesystem-backed blob storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::BlobStorage;
use super::error::StorageError;

/// Reads objects as files under a base directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    base_dir: PathBuf,
}

impl LocalBlobStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve `key` to a path, refusing keys that leave the base directory.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !plain {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.base_dir.join(relative))
    }
}

impl BlobStorage for LocalBlobStorage {
    async fn read_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        debug!(path = %path.display(), "reading local object");

        tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::Io {
                    key: key.to_string(),
                    source,
                }
            }
        })
    }
}
