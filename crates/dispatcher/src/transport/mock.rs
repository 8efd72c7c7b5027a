//! MockTransport - scripted per-URL behaviors for tests and dry runs

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use contracts::{HttpTransport, OutboundRequest, TransportError, TransportResponse};

/// What the mock does for one URL
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Answer immediately
    Respond { status: u16, body: String },
    /// Fail at send time (after the barrier)
    Fail(String),
    /// Sleep, then answer
    Delayed {
        delay: Duration,
        status: u16,
        body: String,
    },
    /// Fail at prepare time (before the barrier)
    Reject(String),
}

impl MockBehavior {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Respond {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Respond {
            status,
            body: body.into(),
        }
    }
}

/// Scripted transport; records every prepared request
#[derive(Debug)]
pub struct MockTransport {
    behaviors: HashMap<String, MockBehavior>,
    fallback: MockBehavior,
    recorded: Mutex<Vec<OutboundRequest>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Every URL answers `200 ok` unless scripted otherwise
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            fallback: MockBehavior::ok("ok"),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Script the behavior for one URL
    pub fn with_behavior(mut self, url: impl Into<String>, behavior: MockBehavior) -> Self {
        self.behaviors.insert(url.into(), behavior);
        self
    }

    /// Behavior for URLs without a script
    pub fn with_fallback(mut self, behavior: MockBehavior) -> Self {
        self.fallback = behavior;
        self
    }

    /// Requests seen by `prepare`, in arrival order
    pub fn recorded(&self) -> Vec<OutboundRequest> {
        match self.recorded.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn behavior_for(&self, url: &str) -> &MockBehavior {
        self.behaviors.get(url).unwrap_or(&self.fallback)
    }
}

impl HttpTransport for MockTransport {
    type Prepared = MockBehavior;

    fn prepare(&self, request: OutboundRequest) -> Result<MockBehavior, TransportError> {
        let behavior = self.behavior_for(&request.url).clone();
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(request.clone());
        }

        match behavior {
            MockBehavior::Reject(message) => {
                Err(TransportError::invalid_request(request.url, message))
            }
            other => Ok(other),
        }
    }

    async fn send(&self, prepared: MockBehavior) -> Result<TransportResponse, TransportError> {
        match prepared {
            MockBehavior::Respond { status, body } => Ok(TransportResponse { status, body }),
            MockBehavior::Fail(message) => Err(TransportError::send(message)),
            MockBehavior::Delayed {
                delay,
                status,
                body,
            } => {
                tokio::time::sleep(delay).await;
                Ok(TransportResponse { status, body })
            }
            MockBehavior::Reject(message) => Err(TransportError::send(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{HeadersConfig, Target};

    fn request(url: &str) -> OutboundRequest {
        OutboundRequest::form_post(
            &Target::new("t", "h", url),
            "p",
            &HeadersConfig::default(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_scripted_and_fallback() {
        let transport = MockTransport::new()
            .with_behavior("https://a/", MockBehavior::status(503, "busy"))
            .with_behavior("https://b/", MockBehavior::Fail("Connection refused".into()));

        let a = transport.prepare(request("https://a/")).unwrap();
        assert_eq!(transport.send(a).await.unwrap().status, 503);

        let b = transport.prepare(request("https://b/")).unwrap();
        assert!(transport.send(b).await.is_err());

        let c = transport.prepare(request("https://c/")).unwrap();
        assert_eq!(transport.send(c).await.unwrap().body, "ok");

        assert_eq!(transport.recorded().len(), 3);
    }

    #[test]
    fn test_reject_fails_prepare() {
        let transport =
            MockTransport::new().with_behavior("bad", MockBehavior::Reject("bad url".into()));
        let err = transport.prepare(request("bad")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest { .. }));
        assert_eq!(transport.recorded().len(), 1);
    }
}
