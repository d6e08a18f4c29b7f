pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod submission;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use common::ArtifactUploader;
use common::config::StorageBackend;
use common::content::ContentStore;
use common::content::github::{GitHubContentStore, build_http_client};
use common::document::{DocumentGenerator, MarkdownDocumentGenerator};
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::s3::S3ObjectStore;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{AppConfig, CorsConfig};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Algorithm Study Submission API",
        version = "1.0.0",
        description = "Submits study solutions to members' GitHub repositories and an object store, and tracks them per problem"
    ),
    tags(
        (name = "Submissions", description = "Solution submission, resubmission, roster and review comments"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Wire the content store, object store and document generator from configuration.
///
/// One HTTP client is built here and shared by every remote call.
pub async fn build_uploader(config: &AppConfig) -> anyhow::Result<ArtifactUploader> {
    let client = build_http_client(&config.remote).context("Failed to build HTTP client")?;
    let content: Arc<dyn ContentStore> =
        Arc::new(GitHubContentStore::new(client, &config.remote.api_url));

    let objects: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::Filesystem => Arc::new(
            FilesystemObjectStore::from_config(
                &config.storage.filesystem,
                config.storage.max_object_size,
            )
            .await
            .context("Failed to initialize filesystem object store")?,
        ),
        StorageBackend::S3 => Arc::new(
            S3ObjectStore::new(&config.storage.s3, config.storage.max_object_size)
                .context("Failed to initialize S3 object store")?,
        ),
    };

    let documents: Arc<dyn DocumentGenerator> = Arc::new(
        MarkdownDocumentGenerator::from_config(&config.document)
            .await
            .context("Failed to initialize document scratch directory")?,
    );

    Ok(ArtifactUploader::new(content, objects, documents))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    let mut router = router
        .with_state(state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    // Objects written to the local store are served from the same process.
    if state.config.storage.backend == StorageBackend::Filesystem {
        router = router.nest_service(
            "/objects",
            ServeDir::new(&state.config.storage.filesystem.root),
        );
    }

    router
        .layer(cors_layer(&state.config.server.cors))
        .layer(TraceLayer::new_for_http())
}
