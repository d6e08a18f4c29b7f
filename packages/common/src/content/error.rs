use thiserror::Error;

/// Errors from the remote content store.
///
/// A missing path is not an error: [`ContentStore::resolve`](super::ContentStore::resolve)
/// returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Network failure, timeout, authentication failure, rate limiting or a 5xx.
    #[error("remote content store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote store refused the request (validation, payload too large, ...).
    #[error("remote content store rejected the request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    /// The fingerprint precondition failed: the path changed since it was resolved.
    #[error("concurrent modification of '{path}'")]
    ConcurrentModification { path: String },
}
