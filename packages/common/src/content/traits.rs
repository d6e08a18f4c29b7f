use std::fmt;

use async_trait::async_trait;

use super::error::ContentError;

/// Opaque version token of a file in the remote repository.
///
/// Never generated locally: it is read immediately before a write and handed
/// back to make that write conditional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-user credential for the remote content store.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// A repository on the remote content store, `{owner}/{name}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Content-addressed remote file storage with optimistic concurrency.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up the current fingerprint of `path`.
    ///
    /// Returns `Ok(None)` when the path does not exist yet.
    async fn resolve(
        &self,
        repo: &RepositoryRef,
        path: &str,
        credential: &AccessToken,
    ) -> Result<Option<Fingerprint>, ContentError>;

    /// Create (`expected == None`) or update (`expected == Some`) the file at `path`.
    ///
    /// On update the write only succeeds if the remote fingerprint still equals
    /// `expected`; otherwise it fails with [`ContentError::ConcurrentModification`].
    /// Returns the new fingerprint of the path.
    async fn write(
        &self,
        repo: &RepositoryRef,
        path: &str,
        content: &[u8],
        annotation: &str,
        expected: Option<&Fingerprint>,
        credential: &AccessToken,
    ) -> Result<Fingerprint, ContentError>;
}
