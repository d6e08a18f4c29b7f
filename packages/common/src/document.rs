//! Description document generation.
//!
//! A submission's description is rendered from a header and a body into a
//! Markdown file buffered in a scratch directory. The file only lives for the
//! duration of one submission flow: [`DocumentGuard`] releases it when the
//! flow ends, whether the uploads succeeded or not.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::config::DocumentConfig;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("description document I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A generated document buffered on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    path: PathBuf,
}

impl DocumentHandle {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders description documents and releases them afterwards.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(&self, header: &str, body: &str) -> Result<DocumentHandle, DocumentError>;

    /// Bytes of a generated document.
    async fn read(&self, handle: &DocumentHandle) -> Result<Vec<u8>, DocumentError>;

    /// Discard a generated document. Releasing an already released handle is a no-op.
    fn release(&self, handle: &DocumentHandle);
}

/// Writes `# {header}\n\n{body}\n` to `{scratch_dir}/{uuid}.md`.
pub struct MarkdownDocumentGenerator {
    scratch_dir: PathBuf,
}

impl MarkdownDocumentGenerator {
    pub async fn new(scratch_dir: PathBuf) -> Result<Self, DocumentError> {
        fs::create_dir_all(&scratch_dir).await?;
        Ok(Self { scratch_dir })
    }

    pub async fn from_config(config: &DocumentConfig) -> Result<Self, DocumentError> {
        Self::new(config.scratch_dir.clone()).await
    }
}

/// Render the Markdown description for a submission.
pub fn render_markdown(header: &str, body: &str) -> String {
    format!("# {}\n\n{}\n", header.trim(), body.trim_end())
}

#[async_trait]
impl DocumentGenerator for MarkdownDocumentGenerator {
    async fn generate(&self, header: &str, body: &str) -> Result<DocumentHandle, DocumentError> {
        let path = self
            .scratch_dir
            .join(format!("{}.md", uuid::Uuid::new_v4()));
        if let Err(e) = fs::write(&path, render_markdown(header, body)).await {
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }
        debug!(path = %path.display(), "Generated description document");
        Ok(DocumentHandle::new(path))
    }

    async fn read(&self, handle: &DocumentHandle) -> Result<Vec<u8>, DocumentError> {
        Ok(fs::read(handle.path()).await?)
    }

    // Blocking removal of one small file; the upload flow expects it gone once the guard drops.
    fn release(&self, handle: &DocumentHandle) {
        match std::fs::remove_file(handle.path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %handle.path().display(),
                error = %e,
                "Failed to release description document"
            ),
        }
    }
}

/// Releases a generated document when dropped.
pub struct DocumentGuard {
    generator: Arc<dyn DocumentGenerator>,
    handle: DocumentHandle,
}

impl DocumentGuard {
    pub fn new(generator: Arc<dyn DocumentGenerator>, handle: DocumentHandle) -> Self {
        Self { generator, handle }
    }

    pub fn handle(&self) -> &DocumentHandle {
        &self.handle
    }
}

impl Drop for DocumentGuard {
    fn drop(&mut self) {
        self.generator.release(&self.handle);
    }
}
