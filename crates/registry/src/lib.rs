//! # Registry
//!
//! Owned target list and default payload, with their persistence.
//!
//! Responsibilities:
//! - Load targets (bootstrap set when nothing usable is stored)
//! - Add/remove targets, persisting after each mutation
//! - Hold the default payload, persisting on change
//! - Extract a payload from free-form or curl-style text
//!
//! Persistence failures are logged and swallowed; the in-memory state
//! stays authoritative for the running process.

mod error;
mod extract;
mod registry;
mod store;

pub use error::RegistryError;
pub use extract::extract_payload;
pub use registry::TargetRegistry;
pub use store::{bootstrap_targets, PayloadStore, TargetStore};
