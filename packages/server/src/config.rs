use common::config::{DocumentConfig, ObjectStorageConfig, RemoteConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Submission payload limits.
#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    /// Maximum code size in bytes. Default: 1 MiB.
    #[serde(default = "default_max_code_size")]
    pub max_code_size: usize,
    /// Maximum description header + body size in bytes. Default: 64 KiB.
    #[serde(default = "default_max_description_size")]
    pub max_description_size: usize,
}

fn default_max_code_size() -> usize {
    1024 * 1024
}
fn default_max_description_size() -> usize {
    64 * 1024
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_code_size: default_max_code_size(),
            max_description_size: default_max_description_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub storage: ObjectStorageConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("ALGOSTUDY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .add_source(File::with_name(&path).required(false))
            // Override from environment (e.g., ALGOSTUDY__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("ALGOSTUDY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
