use tracing::{debug, instrument};

use super::error::ContentError;
use super::traits::{AccessToken, ContentStore, Fingerprint, RepositoryRef};

/// Write `content` to `path`, creating it or replacing the current version.
///
/// Resolves the current fingerprint and immediately hands it to a conditional
/// write. A conflict is returned to the caller as-is; there is no re-read and
/// no retry, so a concurrent writer is never silently overwritten.
#[instrument(skip(store, content, annotation, credential), fields(repo = %repo))]
pub async fn upsert(
    store: &dyn ContentStore,
    repo: &RepositoryRef,
    path: &str,
    content: &[u8],
    annotation: &str,
    credential: &AccessToken,
) -> Result<Fingerprint, ContentError> {
    let current = store.resolve(repo, path, credential).await?;
    debug!(
        path,
        mode = if current.is_some() { "update" } else { "create" },
        "Writing remote file"
    );
    store
        .write(repo, path, content, annotation, current.as_ref(), credential)
        .await
}
