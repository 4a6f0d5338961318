//! S3-backed blob storage.

use aws_sdk_s3::error::DisplayErrorContext;
use tracing::debug;

use super::BlobStorage;
use super::error::StorageError;

/// Full object key for `key` under `prefix`.
///
/// Slashes around the prefix are trimmed; an empty prefix leaves the key
/// unchanged.
pub fn object_key(prefix: &str, key: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}/{key}")
    }
}

/// Reads objects from an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3BlobStorage {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create a client from the standard AWS environment.
    pub async fn from_env(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, prefix)
    }
}

impl BlobStorage for S3BlobStorage {
    async fn read_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let obj_key = object_key(&self.prefix, key);
        debug!(bucket = %self.bucket, key = %obj_key, "reading S3 object");

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&obj_key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound {
                        key: obj_key.clone(),
                    }
                } else {
                    StorageError::S3 {
                        key: obj_key.clone(),
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        let data = resp.body.collect().await.map_err(|e| StorageError::S3 {
            key: obj_key.clone(),
            message: e.to_string(),
        })?;

        Ok(data.into_bytes().to_vec())
    }
}
