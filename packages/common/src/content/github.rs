//! GitHub contents API implementation of [`ContentStore`].
//!
//! `GET /repos/{owner}/{repo}/contents/{path}` resolves the blob `sha` of a
//! file, `PUT` on the same URL creates it (no `sha`) or updates it (`sha` of
//! the version being replaced). GitHub answers a stale `sha` with 409.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::error::ContentError;
use super::traits::{AccessToken, ContentStore, Fingerprint, RepositoryRef};
use crate::config::RemoteConfig;

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Build the process-wide HTTP client used for every remote call.
pub fn build_http_client(config: &RemoteConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .build()
}

#[derive(Deserialize)]
struct ContentMetadata {
    sha: String,
}

#[derive(Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutContentResponse {
    content: ContentMetadata,
}

/// Content store backed by the GitHub REST API.
#[derive(Clone)]
pub struct GitHubContentStore {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubContentStore {
    /// Wrap a shared client. `api_url` is usually `https://api.github.com`.
    pub fn new(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn contents_url(&self, repo: &RepositoryRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            repo.owner,
            repo.name,
            path.trim_start_matches('/')
        )
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        credential: &AccessToken,
        operation: &str,
    ) -> Result<reqwest::Response, ContentError> {
        request
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("token {}", credential.expose()),
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ContentError::RemoteUnavailable(format!("{operation}: request timed out"))
                } else {
                    ContentError::RemoteUnavailable(format!("{operation}: {e}"))
                }
            })
    }
}

/// Map a non-success read status to an error. 404 never reaches here.
///
/// A failed lookup leaves the fingerprint unknown, so every status is `RemoteUnavailable`.
fn read_failure(status: StatusCode, body: String) -> ContentError {
    ContentError::RemoteUnavailable(format!("HTTP {status}: {body}"))
}

/// Map a non-success write status to an error.
///
/// A 422 complaining about a missing `sha` on a create means the path was
/// created by someone else after it was resolved.
fn write_failure(status: StatusCode, body: String, path: &str, creating: bool) -> ContentError {
    match status {
        StatusCode::CONFLICT => ContentError::ConcurrentModification {
            path: path.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY if creating && body.contains("sha") => {
            ContentError::ConcurrentModification {
                path: path.to_string(),
            }
        }
        s if is_unavailable(s) => ContentError::RemoteUnavailable(format!("HTTP {s}: {body}")),
        s => ContentError::RemoteRejected {
            status: s.as_u16(),
            message: body,
        },
    }
}

fn is_unavailable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    ) || status.is_server_error()
}

#[async_trait]
impl ContentStore for GitHubContentStore {
    #[instrument(skip(self, credential), fields(repo = %repo))]
    async fn resolve(
        &self,
        repo: &RepositoryRef,
        path: &str,
        credential: &AccessToken,
    ) -> Result<Option<Fingerprint>, ContentError> {
        let url = self.contents_url(repo, path);
        let resp = self
            .send(self.client.get(&url), credential, "resolve")
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "Remote file does not exist yet");
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(read_failure(status, body));
        }

        let metadata: ContentMetadata = resp.json().await.map_err(|e| {
            ContentError::RemoteUnavailable(format!(
                "HTTP {status}: unexpected metadata response: {e}"
            ))
        })?;

        debug!(path, sha = %metadata.sha, "Resolved remote fingerprint");
        Ok(Some(Fingerprint::new(metadata.sha)))
    }

    #[instrument(skip(self, content, annotation, expected, credential), fields(repo = %repo, bytes = content.len()))]
    async fn write(
        &self,
        repo: &RepositoryRef,
        path: &str,
        content: &[u8],
        annotation: &str,
        expected: Option<&Fingerprint>,
        credential: &AccessToken,
    ) -> Result<Fingerprint, ContentError> {
        let url = self.contents_url(repo, path);
        let body = PutContentRequest {
            message: annotation,
            content: STANDARD.encode(content),
            sha: expected.map(Fingerprint::as_str),
        };

        let resp = self
            .send(self.client.put(&url).json(&body), credential, "write")
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(write_failure(status, text, path, expected.is_none()));
        }

        let written: PutContentResponse =
            resp.json()
                .await
                .map_err(|e| ContentError::RemoteRejected {
                    status: status.as_u16(),
                    message: format!("unexpected write response: {e}"),
                })?;

        info!(
            path,
            created = expected.is_none(),
            sha = %written.content.sha,
            "Committed file to remote repository"
        );
        Ok(Fingerprint::new(written.content.sha))
    }
}
