use async_trait::async_trait;

use super::error::StorageError;

/// Key-addressed public object storage.
///
/// Writing an existing key replaces the object, so re-uploading the same key
/// is idempotent and the public URL stays stable across resubmissions.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` and return its public URL.
    async fn put_object(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Store `data` under `key`, guessing the content type from the key's extension.
    async fn put(&self, key: &str, data: &[u8]) -> Result<String, StorageError> {
        let mime = mime_guess::from_path(key).first_or_octet_stream();
        self.put_object(key, data, mime.essence_str()).await
    }

    /// Public URL an object stored under `key` is served from.
    fn url_for(&self, key: &str) -> String;
}

/// Reject keys that could escape the store root or collide with internals.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == ".." || seg.starts_with(".tmp"));
    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

pub(crate) fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}
