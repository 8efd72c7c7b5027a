//! # Dispatcher
//!
//! Synchronized broadcast of one form POST to many targets.
//!
//! Responsibilities:
//! - Build one request per target ahead of time
//! - Release all senders together through a counting barrier
//! - Collect per-target results under an aggregate deadline

pub mod aggregator;
pub mod barrier;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod slots;
pub mod transport;
mod worker;

pub use aggregator::ResultAggregator;
pub use barrier::{ArrivalTicket, SyncBarrier};
pub use dispatcher::{
    BroadcastDispatcher, DispatcherBuilder, DispatcherConfig, create_http_dispatcher,
};
pub use error::DispatchError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use slots::ResultSlots;
pub use transport::{MockBehavior, MockTransport, ReqwestTransport};
pub use worker::{ERROR_MESSAGE_LIMIT, truncate_message};
