//! SyncpostConfig - Config Loader output
//!
//! Dispatch timing, fixed request headers, storage locations and the
//! registry URL scheme. Every field has a default, so an empty file is valid.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SyncpostConfig {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Dispatch timing
    #[serde(default)]
    #[validate(nested)]
    pub dispatch: DispatchConfig,

    /// Fixed request headers
    #[serde(default)]
    #[validate(nested)]
    pub headers: HeadersConfig,

    /// Persisted state locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// How bare host names become targets
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Fallbacks used when nothing is persisted yet
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Dispatch timing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DispatchConfig {
    /// Aggregate wait bound per dispatch (seconds)
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 3600))]
    pub default_timeout_secs: u64,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// Verify TLS certificates (off by default)
    #[serde(default)]
    pub verify_tls: bool,
}

impl DispatchConfig {
    /// Aggregate wait bound
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            verify_tls: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Fixed headers sent with every request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HeadersConfig {
    /// Value of the `apikey` header
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Value of the `user-agent` header
    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    /// Additional fixed headers (name -> value)
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            user_agent: default_user_agent(),
            extra: BTreeMap::new(),
        }
    }
}

/// Placeholder `apikey` value used when none is configured
pub const DEFAULT_API_KEY: &str = "changeme";

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_user_agent() -> String {
    format!("syncpost/{}", env!("CARGO_PKG_VERSION"))
}

/// Persisted state locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON array of targets
    #[serde(default = "default_targets_file")]
    pub targets_file: PathBuf,

    /// Plain-text default payload
    #[serde(default = "default_payload_file")]
    pub payload_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            targets_file: default_targets_file(),
            payload_file: default_payload_file(),
        }
    }
}

fn default_targets_file() -> PathBuf {
    PathBuf::from("hosts.json")
}

fn default_payload_file() -> PathBuf {
    PathBuf::from("default_data.txt")
}

/// URL shape for targets added by bare host name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// `http` or `https`
    #[serde(default = "default_url_scheme")]
    pub url_scheme: String,

    /// Absolute path appended to the host
    #[serde(default = "default_url_path")]
    pub url_path: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url_scheme: default_url_scheme(),
            url_path: default_url_path(),
        }
    }
}

fn default_url_scheme() -> String {
    "https".to_string()
}

fn default_url_path() -> String {
    "/api/submit".to_string()
}

/// Fallbacks used when nothing is persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Default payload when the payload store is empty
    #[serde(default)]
    pub default_payload: Option<String>,
}
