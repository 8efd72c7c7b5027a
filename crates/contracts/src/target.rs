//! Target - one broadcast endpoint

use serde::{Deserialize, Serialize};

/// Delivery endpoint
///
/// `host` is sent verbatim as the `Host` header, independent of the URL,
/// so a target may be addressed by IP while presenting a virtual host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Display name used in reports and logs
    pub name: String,

    /// Value of the `Host` request header
    pub host: String,

    /// Full request URL
    pub url: String,
}

impl Target {
    /// Create a target from its three parts
    pub fn new(name: impl Into<String>, host: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            url: url.into(),
        }
    }

    /// Target addressed by bare host name: name and `Host` header are the host,
    /// URL is `{scheme}://{host}{path}`
    pub fn from_host(host: &str, scheme: &str, path: &str) -> Self {
        Self::new(host, host, format!("{scheme}://{host}{path}"))
    }
}
