//! # Contracts
//!
//! Shared interface contracts for the broadcast pipeline.
//! Every other crate depends on this one; it depends on none of them.
//!
//! ## Time Model
//! - Send timestamps are monotonic (`Instant`) and only meaningful within one process
//! - Wall-clock time (`chrono::DateTime<Utc>`) is carried for reporting only

mod config;
mod dispatch;
mod error;
mod target;
mod transport;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use target::Target;
pub use transport::*;
