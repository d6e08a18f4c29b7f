use async_trait::async_trait;
use s3::Bucket;
use s3::Region;
use s3::creds::Credentials;
use tracing::{debug, warn};

use super::error::StorageError;
use super::traits::{ObjectStore, join_url, validate_key};
use crate::config::S3StorageConfig;

/// Object store backed by an S3-compatible bucket.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_url: String,
    max_size: u64,
}

impl S3ObjectStore {
    pub fn new(config: &S3StorageConfig, max_size: u64) -> Result<Self, StorageError> {
        let region = if config.endpoint.is_empty() {
            config
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?
        } else {
            Region::Custom {
                region: config.region.clone(),
                endpoint: config.endpoint.clone(),
            }
        };

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        let public_url = if config.public_url.is_empty() {
            bucket.url()
        } else {
            config.public_url.clone()
        };

        Ok(Self {
            bucket,
            public_url,
            max_size,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_key(key)?;
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            warn!(key, status, "Object upload rejected");
            return Err(StorageError::Backend(format!(
                "PUT {key} returned HTTP {status}"
            )));
        }

        debug!(key, content_type, bytes = data.len(), "Uploaded object");
        Ok(self.url_for(key))
    }

    fn url_for(&self, key: &str) -> String {
        join_url(&self.public_url, key)
    }
}
