use std::path::PathBuf;

use serde::Deserialize;

/// Remote content store (GitHub contents API) configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Base URL of the API. Default: "https://api.github.com".
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// `User-Agent` header sent with every request. GitHub rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Total request timeout in seconds. Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds. Default: 5.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// How long idle pooled connections are kept, in seconds. Default: 90.
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}
fn default_user_agent() -> String {
    "algo-study-sync".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_pool_idle_timeout_secs() -> u64 {
    90
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
        }
    }
}

/// Which object store backend to use.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Local directory object store settings.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    /// Directory objects are written under. Default: "./data/objects".
    #[serde(default = "default_filesystem_root")]
    pub root: PathBuf,
    /// URL prefix the directory is served from. Default: "http://127.0.0.1:3000/objects".
    #[serde(default = "default_filesystem_public_url")]
    pub public_url: String,
}

fn default_filesystem_root() -> PathBuf {
    PathBuf::from("./data/objects")
}
fn default_filesystem_public_url() -> String {
    "http://127.0.0.1:3000/objects".into()
}

impl Default for FilesystemStorageConfig {
    fn default() -> Self {
        Self {
            root: default_filesystem_root(),
            public_url: default_filesystem_public_url(),
        }
    }
}

/// S3-compatible bucket settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2). Empty for AWS.
    #[serde(default)]
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Use path-style addressing (`{endpoint}/{bucket}/{key}`).
    #[serde(default)]
    pub path_style: bool,
    /// Public URL prefix for objects. Defaults to the bucket URL when empty.
    #[serde(default)]
    pub public_url: String,
}

/// Object store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ObjectStorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub filesystem: FilesystemStorageConfig,
    #[serde(default)]
    pub s3: S3StorageConfig,
    /// Maximum size of a single object in bytes. Default: 8 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
}

fn default_max_object_size() -> u64 {
    8 * 1024 * 1024
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            filesystem: FilesystemStorageConfig::default(),
            s3: S3StorageConfig::default(),
            max_object_size: default_max_object_size(),
        }
    }
}

/// Description document generator configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Directory generated documents are buffered in until uploaded. Default: "./data/scratch".
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("./data/scratch")
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
        }
    }
}
