//! Layered error definitions
//!
//! Categorized by source: config / transport / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Per-target transport failure
///
/// Never propagated out of a dispatch; workers turn it into a failed
/// `DispatchResult`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built (bad URL, illegal header value)
    #[error("invalid request for '{url}': {message}")]
    InvalidRequest { url: String, message: String },

    /// Connection, TLS or protocol failure while sending
    #[error("{0}")]
    Send(String),

    /// No response within the per-request timeout
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl TransportError {
    /// Create invalid request error
    pub fn invalid_request(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create send error
    pub fn send(message: impl Into<String>) -> Self {
        Self::Send(message.into())
    }
}
