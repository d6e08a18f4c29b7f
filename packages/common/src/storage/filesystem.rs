use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::StorageError;
use super::traits::{ObjectStore, join_url, validate_key};
use crate::config::FilesystemStorageConfig;

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{key}` and are expected to be served
/// statically under `public_url`. Writes go through `{base_path}/.tmp` and
/// are renamed into place, so readers never observe a partial object.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_url: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        base_path: PathBuf,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_url: public_url.into(),
            max_size,
        })
    }

    pub async fn from_config(
        config: &FilesystemStorageConfig,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        Self::new(config.root.clone(), config.public_url.clone(), max_size).await
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
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

        let object_path = self.object_path(key);
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(key, content_type, bytes = data.len(), "Stored object");
        Ok(self.url_for(key))
    }

    fn url_for(&self, key: &str) -> String {
        join_url(&self.public_url, key)
    }
}
