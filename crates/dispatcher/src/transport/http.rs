//! ReqwestTransport - HTTPS form POST via reqwest

use std::error::Error as StdError;

use contracts::{HttpTransport, OutboundRequest, TransportError, TransportResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Request};
use tracing::{debug, instrument};

use crate::error::DispatchError;

/// Root cause first, then the outermost context
///
/// Keeps the informative part ("Connection refused") inside the report's
/// truncation limit.
fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let top = err.to_string();
    let mut root = err;
    while let Some(source) = root.source() {
        root = source;
    }
    if std::ptr::addr_eq(root, err) {
        top
    } else {
        format!("{root}: {top}")
    }
}

/// Transport backed by one shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build the client; `verify_tls = false` accepts any certificate
    pub fn new(verify_tls: bool) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| DispatchError::transport_init(describe_error(&e)))?;

        debug!(verify_tls, "ReqwestTransport created");
        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn header_map(request: &OutboundRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                TransportError::invalid_request(&request.url, format!("header '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                TransportError::invalid_request(&request.url, format!("header '{name}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }
}

impl HttpTransport for ReqwestTransport {
    type Prepared = Request;

    fn prepare(&self, request: OutboundRequest) -> Result<Request, TransportError> {
        let headers = Self::header_map(&request)?;
        // Body goes out byte-for-byte; no form re-encoding.
        self.client
            .post(&request.url)
            .headers(headers)
            .timeout(request.timeout)
            .body(request.body)
            .build()
            .map_err(|e| TransportError::invalid_request(&request.url, describe_error(&e)))
    }

    #[instrument(
        name = "reqwest_transport_send",
        skip(self, prepared),
        fields(url = %prepared.url())
    )]
    async fn send(&self, prepared: Request) -> Result<TransportResponse, TransportError> {
        let response = self.client.execute(prepared).await.map_err(|e| {
            if e.is_timeout() {
                TransportError::send(format!("request timed out: {}", describe_error(&e)))
            } else {
                TransportError::send(describe_error(&e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::send(describe_error(&e)))?;

        debug!(status, body_len = body.len(), "Response received");
        Ok(TransportResponse { status, body })
    }
}
