mod commit;
mod error;
mod traits;

pub mod github;

pub use commit::upsert;
pub use error::ContentError;
pub use traits::{AccessToken, ContentStore, Fingerprint, RepositoryRef};
