//! Registry error types

use std::path::PathBuf;
use thiserror::Error;

/// Registry-specific errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Store file read/write failure
    #[error("store io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file content is not a target list
    #[error("store format error at '{}': {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Rejected host name
    #[error("invalid host '{host}': {message}")]
    InvalidHost { host: String, message: String },
}

impl RegistryError {
    /// Create io error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create format error for a path
    pub fn format(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }

    /// Create invalid host error
    pub fn invalid_host(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHost {
            host: host.into(),
            message: message.into(),
        }
    }
}
