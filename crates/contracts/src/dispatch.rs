//! DispatchResult / BroadcastOutcome - Dispatcher output
//!
//! One result per target, index-aligned with the input target order.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Response text of a slot no worker ever filled
pub const NO_RESULT_RESPONSE: &str = "No result";

/// Outcome classification of one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// An HTTP response arrived (any status code)
    Http(u16),
    /// Transport-level failure (connect, TLS, timeout, bad request)
    Error,
    /// Worker did not finish before the aggregate deadline
    NoResponse,
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{code}"),
            Self::Error => write!(f, "Error"),
            Self::NoResponse => write!(f, "NoResponse"),
        }
    }
}

// Numeric code for HTTP responses, string tag otherwise.
impl Serialize for DispatchStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Http(code) => serializer.serialize_u16(*code),
            Self::Error => serializer.serialize_str("Error"),
            Self::NoResponse => serializer.serialize_str("NoResponse"),
        }
    }
}

/// Result of one target's send attempt
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    /// Target name
    pub target: String,

    /// True iff an HTTP response of any status was received
    pub success: bool,

    /// Status classification
    pub status: DispatchStatus,

    /// Time from send to response/failure (milliseconds)
    pub network_time_ms: f64,

    /// Response body, or error message on failure
    pub response: String,

    /// Moment the worker was released from the barrier and sent
    #[serde(skip)]
    pub sent_at: Option<Instant>,

    /// `sent_at` relative to the dispatch start (milliseconds); null when
    /// the request never went out
    pub sent_offset_ms: Option<f64>,
}

impl DispatchResult {
    /// Fill `sent_offset_ms` from `sent_at` relative to `origin`
    pub fn with_sent_offset(mut self, origin: Instant) -> Self {
        self.sent_offset_ms = self
            .sent_at
            .map(|t| t.saturating_duration_since(origin).as_secs_f64() * 1000.0);
        self
    }

    /// An HTTP response was received
    pub fn responded(
        target: impl Into<String>,
        status_code: u16,
        network_time_ms: f64,
        body: impl Into<String>,
        sent_at: Instant,
    ) -> Self {
        Self {
            target: target.into(),
            success: true,
            status: DispatchStatus::Http(status_code),
            network_time_ms,
            response: body.into(),
            sent_at: Some(sent_at),
            sent_offset_ms: None,
        }
    }

    /// Transport failure; `sent_at` is `None` when the request was never sent
    pub fn failed(
        target: impl Into<String>,
        message: impl Into<String>,
        network_time_ms: f64,
        sent_at: Option<Instant>,
    ) -> Self {
        Self {
            target: target.into(),
            success: false,
            status: DispatchStatus::Error,
            network_time_ms,
            response: message.into(),
            sent_at,
            sent_offset_ms: None,
        }
    }

    /// Synthetic result for a slot left empty at the aggregate deadline
    pub fn no_response(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            success: false,
            status: DispatchStatus::NoResponse,
            network_time_ms: 0.0,
            response: NO_RESULT_RESPONSE.to_string(),
            sent_at: None,
            sent_offset_ms: None,
        }
    }
}

/// Aggregated report of one dispatch call
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastOutcome {
    /// Wall-clock start of the dispatch
    pub started_at: DateTime<Utc>,

    /// Per-target results, index-aligned with the target list
    pub results: Vec<DispatchResult>,

    /// Dispatch entry to end of wait (milliseconds)
    pub total_time_ms: f64,

    /// Spread between earliest and latest send (milliseconds)
    pub max_send_time_diff_ms: f64,
}

impl BroadcastOutcome {
    /// Number of targets that returned an HTTP response
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Count results per classification
    pub fn summary(&self) -> BroadcastSummary {
        let mut summary = BroadcastSummary {
            total: self.results.len(),
            ..BroadcastSummary::default()
        };
        for result in &self.results {
            match result.status {
                DispatchStatus::Http(_) => summary.succeeded += 1,
                DispatchStatus::Error => summary.failed += 1,
                DispatchStatus::NoResponse => summary.no_response += 1,
            }
        }
        summary
    }
}

/// Per-classification counts of a `BroadcastOutcome`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub no_response: usize,
}
