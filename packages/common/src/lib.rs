pub mod artifact;
pub mod config;
pub mod content;
pub mod document;
pub mod language;
pub mod storage;


pub use artifact::{ArtifactError, ArtifactTarget, ArtifactUploader, UploadedArtifacts};
pub use language::Language;
