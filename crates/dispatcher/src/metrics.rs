//! Dispatcher counters for in-process reporting

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::BroadcastSummary;

/// Cumulative counters across all dispatches of one dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Dispatch calls that started
    dispatch_count: AtomicU64,
    /// Dispatches that hit the aggregate deadline
    timeout_count: AtomicU64,
    /// Targets that returned an HTTP response
    success_count: AtomicU64,
    /// Targets that failed at transport level
    failure_count: AtomicU64,
    /// Targets synthesized as no-response
    no_response_count: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count.load(Ordering::Relaxed)
    }

    pub fn inc_dispatch_count(&self) {
        self.dispatch_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn timeout_count(&self) -> u64 {
        self.timeout_count.load(Ordering::Relaxed)
    }

    pub fn inc_timeout_count(&self) {
        self.timeout_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn no_response_count(&self) -> u64 {
        self.no_response_count.load(Ordering::Relaxed)
    }

    /// Fold one dispatch's per-target counts in
    pub fn record_summary(&self, summary: &BroadcastSummary) {
        self.success_count
            .fetch_add(summary.succeeded as u64, Ordering::Relaxed);
        self.failure_count
            .fetch_add(summary.failed as u64, Ordering::Relaxed);
        self.no_response_count
            .fetch_add(summary.no_response as u64, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatch_count: self.dispatch_count(),
            timeout_count: self.timeout_count(),
            success_count: self.success_count(),
            failure_count: self.failure_count(),
            no_response_count: self.no_response_count(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub dispatch_count: u64,
    pub timeout_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub no_response_count: u64,
}
