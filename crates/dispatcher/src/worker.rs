//! Per-target send task
//!
//! prepare -> barrier -> send -> fill own slot. A worker never writes any
//! slot but its own index.

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{DispatchResult, HttpTransport, OutboundRequest, TransportError};
use tracing::{debug, instrument, warn};

use crate::barrier::ArrivalTicket;
use crate::slots::ResultSlots;

/// Maximum chars kept from a transport error message
pub const ERROR_MESSAGE_LIMIT: usize = 120;

/// Keep the first `limit` chars, appending `...` when cut
pub fn truncate_message(message: &str, limit: usize) -> String {
    match message.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

/// Everything one worker needs, moved into its task
pub(crate) struct SendJob<T> {
    pub index: usize,
    pub target_name: String,
    pub request: OutboundRequest,
    pub transport: Arc<T>,
    pub ticket: ArrivalTicket,
    pub slots: Arc<ResultSlots>,
}

impl<T> SendJob<T>
where
    T: HttpTransport + Sync + 'static,
{
    #[instrument(
        name = "dispatch_worker",
        skip(self),
        fields(index = self.index, target = %self.target_name)
    )]
    pub async fn run(self) {
        let SendJob {
            index,
            target_name,
            request,
            transport,
            ticket,
            slots,
        } = self;

        let timeout = request.timeout;
        let result = match transport.prepare(request) {
            Ok(prepared) => {
                ticket.wait().await;
                let sent_at = Instant::now();
                send_prepared(&*transport, prepared, timeout, &target_name, sent_at).await
            }
            Err(e) => {
                // Dropping the ticket counts this worker as arrived.
                drop(ticket);
                warn!(error = %e, "Request could not be prepared");
                DispatchResult::failed(
                    &target_name,
                    truncate_message(&e.to_string(), ERROR_MESSAGE_LIMIT),
                    0.0,
                    None,
                )
            }
        };

        if !slots.fill(index, result) {
            warn!("Result slot already filled");
        }
    }
}

async fn send_prepared<T>(
    transport: &T,
    prepared: T::Prepared,
    timeout: Duration,
    target_name: &str,
    sent_at: Instant,
) -> DispatchResult
where
    T: HttpTransport,
{
    let outcome = match tokio::time::timeout(timeout, transport.send(prepared)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };
    let network_time_ms = elapsed_ms(sent_at);

    match outcome {
        Ok(response) => {
            debug!(status = response.status, network_time_ms, "Target responded");
            DispatchResult::responded(
                target_name,
                response.status,
                network_time_ms,
                response.body,
                sent_at,
            )
        }
        Err(e) => {
            debug!(error = %e, network_time_ms, "Target failed");
            DispatchResult::failed(
                target_name,
                truncate_message(&e.to_string(), ERROR_MESSAGE_LIMIT),
                network_time_ms,
                Some(sent_at),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barrier::SyncBarrier;
    use crate::transport::{MockBehavior, MockTransport};
    use contracts::{DispatchStatus, HeadersConfig, Target};

    fn job(
        transport: &Arc<MockTransport>,
        barrier: &Arc<SyncBarrier>,
        slots: &Arc<ResultSlots>,
        index: usize,
        url: &str,
        timeout: Duration,
    ) -> SendJob<MockTransport> {
        let target = Target::new(format!("t{index}"), "h", url);
        SendJob {
            index,
            target_name: target.name.clone(),
            request: OutboundRequest::form_post(&target, "p", &HeadersConfig::default(), timeout),
            transport: Arc::clone(transport),
            ticket: barrier.ticket(),
            slots: Arc::clone(slots),
        }
    }

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("short", 120), "short");
        let long = "x".repeat(130);
        let cut = truncate_message(&long, 120);
        assert_eq!(cut.len(), 123);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_message(&"é".repeat(121), 120).chars().count(), 123);
        assert_eq!(truncate_message(&"y".repeat(120), 120), "y".repeat(120));
    }

    #[tokio::test]
    async fn test_rejected_worker_does_not_block_others() {
        let transport = Arc::new(
            MockTransport::new().with_behavior("bad", MockBehavior::Reject("bad url".into())),
        );
        let barrier = Arc::new(SyncBarrier::new(2));
        let slots = Arc::new(ResultSlots::new(2));
        let secs = Duration::from_secs(1);

        let good = tokio::spawn(job(&transport, &barrier, &slots, 0, "https://ok/", secs).run());
        job(&transport, &barrier, &slots, 1, "bad", secs).run().await;
        tokio::time::timeout(Duration::from_secs(1), good)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(slots.get(0).unwrap().status, DispatchStatus::Http(200));
        let rejected = slots.get(1).unwrap();
        assert_eq!(rejected.status, DispatchStatus::Error);
        assert!(rejected.sent_at.is_none());
        assert_eq!(rejected.network_time_ms, 0.0);
    }

    #[tokio::test]
    async fn test_per_request_timeout() {
        let transport = Arc::new(MockTransport::new().with_fallback(MockBehavior::Delayed {
            delay: Duration::from_secs(5),
            status: 200,
            body: "late".into(),
        }));
        let barrier = Arc::new(SyncBarrier::new(1));
        let slots = Arc::new(ResultSlots::new(1));

        job(&transport, &barrier, &slots, 0, "slow", Duration::from_millis(50))
            .run()
            .await;

        let result = slots.get(0).unwrap();
        assert_eq!(result.status, DispatchStatus::Error);
        assert!(result.response.contains("timed out"));
        assert!(result.sent_at.is_some());
    }
}
