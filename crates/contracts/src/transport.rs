//! HttpTransport trait - Dispatcher network interface
//!
//! Split into `prepare` (runs before the barrier) and `send` (runs after),
//! so everything that can be done ahead of release is off the hot path.

use std::time::Duration;

use crate::{HeadersConfig, Target, TransportError};

/// Prefix of the form-encoded request body
pub const FORM_FIELD_PREFIX: &str = "data=";

/// Fixed content type of the outbound body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request body for a payload: the literal `data=<payload>`, no further encoding
pub fn form_body(payload: &str) -> String {
    format!("{FORM_FIELD_PREFIX}{payload}")
}

/// Byte length of `data=<payload>`
pub fn content_length(payload: &str) -> usize {
    FORM_FIELD_PREFIX.len() + payload.len()
}

/// Transport-independent description of one POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Request URL
    pub url: String,

    /// Header name/value pairs, in send order
    pub headers: Vec<(String, String)>,

    /// Raw request body
    pub body: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl OutboundRequest {
    /// Build the form POST for a target
    ///
    /// Header order: `apikey`, `content-type`, `user-agent`, configured extras,
    /// `Host`, `content-length`.
    pub fn form_post(
        target: &Target,
        payload: &str,
        headers: &HeadersConfig,
        timeout: Duration,
    ) -> Self {
        let mut pairs = Vec::with_capacity(5 + headers.extra.len());
        pairs.push(("apikey".to_string(), headers.api_key.clone()));
        pairs.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        pairs.push(("user-agent".to_string(), headers.user_agent.clone()));
        for (name, value) in &headers.extra {
            pairs.push((name.clone(), value.clone()));
        }
        pairs.push(("Host".to_string(), target.host.clone()));
        pairs.push(("content-length".to_string(), content_length(payload).to_string()));

        Self {
            url: target.url.clone(),
            headers: pairs,
            body: form_body(payload),
            timeout,
        }
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric status code
    pub status: u16,

    /// Body decoded as text
    pub body: String,
}

/// Outbound HTTP interface
///
/// Implementations must be cheap to share across worker tasks.
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    /// Transport-specific ready-to-send request
    type Prepared: Send + 'static;

    /// Validate and build the request
    ///
    /// # Errors
    /// Returns `TransportError::InvalidRequest` if the request cannot be built
    fn prepare(&self, request: OutboundRequest) -> Result<Self::Prepared, TransportError>;

    /// Send a prepared request and read the full response body
    ///
    /// # Errors
    /// Returns transport failure (connect, TLS, protocol)
    async fn send(&self, prepared: Self::Prepared) -> Result<TransportResponse, TransportError>;
}
