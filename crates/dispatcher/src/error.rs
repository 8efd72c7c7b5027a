//! Dispatcher error types
//!
//! Only failures that stop a dispatch from starting live here; per-target
//! failures become `DispatchResult`s.

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Empty target set; nothing was sent
    #[error("no targets configured")]
    NoTargets,

    /// HTTP client construction failed
    #[error("failed to initialize transport: {message}")]
    TransportInit { message: String },

    /// Contract-level error
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatchError {
    /// Create a transport init error
    pub fn transport_init(message: impl Into<String>) -> Self {
        Self::TransportInit {
            message: message.into(),
        }
    }
}
