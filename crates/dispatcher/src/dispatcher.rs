//! BroadcastDispatcher - barrier-synchronized fan-out of one POST per target

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use contracts::{
    BroadcastOutcome, DispatchResult, HeadersConfig, HttpTransport, OutboundRequest,
    SyncpostConfig, Target,
};

use crate::aggregator::ResultAggregator;
use crate::barrier::SyncBarrier;
use crate::error::DispatchError;
use crate::metrics::DispatchMetrics;
use crate::slots::ResultSlots;
use crate::transport::ReqwestTransport;
use crate::worker::SendJob;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Aggregate deadline when the caller passes none
    pub default_timeout: Duration,
    /// Per-request deadline
    pub request_timeout: Duration,
    /// Headers sent with every request
    pub headers: HeadersConfig,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from(&SyncpostConfig::default())
    }
}

impl From<&SyncpostConfig> for DispatcherConfig {
    fn from(config: &SyncpostConfig) -> Self {
        Self {
            default_timeout: config.dispatch.default_timeout(),
            request_timeout: config.dispatch.request_timeout(),
            headers: config.headers.clone(),
        }
    }
}

/// Builder for creating a BroadcastDispatcher
pub struct DispatcherBuilder<T> {
    config: DispatcherConfig,
    transport: T,
    targets: Vec<Target>,
    default_payload: String,
}

impl<T> DispatcherBuilder<T>
where
    T: HttpTransport + Sync + 'static,
{
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            targets: Vec::new(),
            default_payload: String::new(),
        }
    }

    pub fn targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = targets;
        self
    }

    pub fn default_payload(mut self, payload: impl Into<String>) -> Self {
        self.default_payload = payload.into();
        self
    }

    pub fn build(self) -> BroadcastDispatcher<T> {
        BroadcastDispatcher {
            targets: self.targets,
            default_payload: self.default_payload,
            transport: Arc::new(self.transport),
            config: self.config,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }
}

/// Sends one payload to every target at (nearly) the same instant
///
/// Target list and default payload are snapshots taken at build time;
/// later registry edits do not affect an existing dispatcher.
pub struct BroadcastDispatcher<T> {
    targets: Vec<Target>,
    default_payload: String,
    transport: Arc<T>,
    config: DispatcherConfig,
    metrics: Arc<DispatchMetrics>,
}

impl<T> BroadcastDispatcher<T>
where
    T: HttpTransport + Sync + 'static,
{
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn default_payload(&self) -> &str {
        &self.default_payload
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Broadcast the default payload
    pub async fn dispatch_default(
        &self,
        timeout: Option<Duration>,
    ) -> Result<BroadcastOutcome, DispatchError> {
        self.dispatch(&self.default_payload, timeout).await
    }

    /// Broadcast `payload` to every target
    ///
    /// Workers prepare their request, meet at a barrier sized to the target
    /// count, then send. After `timeout` (default from config) unfinished
    /// workers are aborted and their slots reported as `NoResponse`.
    ///
    /// Sends only run in parallel on a multi-thread tokio runtime; on a
    /// current-thread runtime the released workers are polled one by one.
    ///
    /// # Errors
    /// `DispatchError::NoTargets` if the target list is empty
    #[instrument(
        name = "broadcast_dispatch",
        skip(self, payload),
        fields(targets = self.targets.len(), payload_bytes = payload.len())
    )]
    pub async fn dispatch(
        &self,
        payload: &str,
        timeout: Option<Duration>,
    ) -> Result<BroadcastOutcome, DispatchError> {
        let started = Instant::now();
        let started_at = Utc::now();

        if self.targets.is_empty() {
            warn!("Dispatch requested with no targets");
            return Err(DispatchError::NoTargets);
        }

        self.metrics.inc_dispatch_count();
        let deadline = timeout.unwrap_or(self.config.default_timeout);
        let count = self.targets.len();

        let barrier = Arc::new(SyncBarrier::new(count));
        let slots = Arc::new(ResultSlots::new(count));
        let mut workers = JoinSet::new();

        for (index, target) in self.targets.iter().enumerate() {
            let job = SendJob {
                index,
                target_name: target.name.clone(),
                request: OutboundRequest::form_post(
                    target,
                    payload,
                    &self.config.headers,
                    self.config.request_timeout,
                ),
                transport: Arc::clone(&self.transport),
                ticket: barrier.ticket(),
                slots: Arc::clone(&slots),
            };
            workers.spawn(job.run());
        }
        debug!(workers = count, "Workers spawned");

        let joined = tokio::time::timeout(deadline, async {
            while let Some(joined) = workers.join_next().await {
                if let Err(e) = joined {
                    error!(error = %e, "Dispatch worker panicked");
                }
            }
        })
        .await;

        let total_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        if joined.is_err() {
            warn!(
                timeout_ms = deadline.as_millis() as u64,
                finished = slots.filled(),
                targets = count,
                "Aggregate deadline reached, aborting unfinished workers"
            );
            self.metrics.inc_timeout_count();
            workers.abort_all();
        }

        let results =
            slots.collect_or_else(|index| DispatchResult::no_response(&self.targets[index].name));
        let outcome = ResultAggregator::finalize(started, started_at, results, total_time_ms);

        let summary = outcome.summary();
        self.metrics.record_summary(&summary);
        observability::record_broadcast_metrics(&outcome);

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            no_response = summary.no_response,
            total_time_ms = outcome.total_time_ms,
            max_send_time_diff_ms = outcome.max_send_time_diff_ms,
            "Broadcast complete"
        );

        Ok(outcome)
    }
}

/// Convenience function to create a reqwest-backed dispatcher from config
#[instrument(name = "dispatcher_create", skip(config, targets, default_payload))]
pub fn create_http_dispatcher(
    config: &SyncpostConfig,
    targets: Vec<Target>,
    default_payload: impl Into<String>,
) -> Result<BroadcastDispatcher<ReqwestTransport>, DispatchError> {
    let transport = ReqwestTransport::new(config.dispatch.verify_tls)?;
    Ok(DispatcherBuilder::new(DispatcherConfig::from(config), transport)
        .targets(targets)
        .default_payload(default_payload)
        .build())
}
