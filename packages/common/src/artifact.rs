//! Artifact Upload Orchestrator.
//!
//! A submission produces two artifacts: the code file and a generated
//! description document. Both are committed to the submitter's copy of the
//! study repository and then published to the object store. The remote
//! repository writes strictly precede the object uploads; a failure at any
//! step aborts everything after it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::content::{self, AccessToken, ContentError, ContentStore, Fingerprint, RepositoryRef};
use crate::document::{DocumentError, DocumentGenerator, DocumentGuard};
use crate::language::Language;
use crate::storage::{ObjectStore, StorageError};

/// File name of the description document inside a submission directory.
pub const DESCRIPTION_FILE: &str = "README.md";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Identity of the (study, problem, submitter) a submission is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub repository_name: String,
    pub problem_number: i32,
    pub problem_title: String,
    pub display_name: String,
    pub language: Language,
}

/// Where one artifact lives in each backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub repository_path: String,
    pub object_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub code: ArtifactLocation,
    pub description: ArtifactLocation,
}

impl ArtifactTarget {
    /// The submitter's copy of the study repository.
    pub fn repository(&self) -> RepositoryRef {
        RepositoryRef::new(&self.display_name, &self.repository_name)
    }

    pub fn code_file_name(&self) -> String {
        format!("{}.{}", self.problem_number, self.language.extension())
    }

    /// Derive the remote paths and object keys of both artifacts.
    ///
    /// Depends only on the target, so a resubmission always addresses the
    /// same locations.
    pub fn paths(&self) -> ArtifactPaths {
        let dir = format!("{}/{}", self.problem_number, self.display_name);
        let location = |file: &str| ArtifactLocation {
            repository_path: format!("{dir}/{file}"),
            object_key: format!("{}/{dir}/{file}", self.repository_name),
        };
        ArtifactPaths {
            code: location(&self.code_file_name()),
            description: location(DESCRIPTION_FILE),
        }
    }

    /// Commit message used for both remote writes.
    pub fn annotation(&self) -> String {
        format!(
            "[{}] #{} {}",
            self.display_name, self.problem_number, self.problem_title
        )
    }
}

/// One artifact after it has been written to both stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub repository_path: String,
    pub fingerprint: Fingerprint,
    pub object_key: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifacts {
    pub code: StoredArtifact,
    pub description: StoredArtifact,
}

/// Coordinates the content store, object store and document generator for one submission.
#[derive(Clone)]
pub struct ArtifactUploader {
    content: Arc<dyn ContentStore>,
    objects: Arc<dyn ObjectStore>,
    documents: Arc<dyn DocumentGenerator>,
}

impl ArtifactUploader {
    pub fn new(
        content: Arc<dyn ContentStore>,
        objects: Arc<dyn ObjectStore>,
        documents: Arc<dyn DocumentGenerator>,
    ) -> Self {
        Self {
            content,
            objects,
            documents,
        }
    }

    /// Upload the code and the generated description of a submission.
    ///
    /// Order: code commit, description commit, code object, description
    /// object. The generated document is released before returning on every
    /// path, including errors. Nothing is rolled back on failure; resubmitting
    /// overwrites the same locations.
    #[instrument(
        skip(self, credential, code, header, body),
        fields(repo = %target.repository(), problem = target.problem_number)
    )]
    pub async fn submit(
        &self,
        target: &ArtifactTarget,
        credential: &AccessToken,
        code: &[u8],
        header: &str,
        body: &str,
    ) -> Result<UploadedArtifacts, ArtifactError> {
        let paths = target.paths();
        let repo = target.repository();
        let annotation = target.annotation();

        let handle = self.documents.generate(header, body).await?;
        let guard = DocumentGuard::new(self.documents.clone(), handle);
        let description = self.documents.read(guard.handle()).await?;

        let code_fp = content::upsert(
            self.content.as_ref(),
            &repo,
            &paths.code.repository_path,
            code,
            &annotation,
            credential,
        )
        .await?;
        let description_fp = content::upsert(
            self.content.as_ref(),
            &repo,
            &paths.description.repository_path,
            &description,
            &annotation,
            credential,
        )
        .await?;

        let code_url = self.objects.put(&paths.code.object_key, code).await?;
        let description_url = self
            .objects
            .put(&paths.description.object_key, &description)
            .await?;
        drop(guard);

        info!(%code_url, %description_url, "Uploaded submission artifacts");

        Ok(UploadedArtifacts {
            code: StoredArtifact {
                repository_path: paths.code.repository_path,
                fingerprint: code_fp,
                object_key: paths.code.object_key,
                url: code_url,
            },
            description: StoredArtifact {
                repository_path: paths.description.repository_path,
                fingerprint: description_fp,
                object_key: paths.description.object_key,
                url: description_url,
            },
        })
    }
}
