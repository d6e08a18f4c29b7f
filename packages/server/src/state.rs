use std::sync::Arc;

use common::ArtifactUploader;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub uploader: ArtifactUploader,
}
