//! `status` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use registry::TargetRegistry;
use serde::Serialize;

use super::load_config;
use crate::cli::StatusArgs;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Status {
    targets: usize,
    default_payload_chars: usize,
    content_length: usize,
}

impl Status {
    fn of(registry: &TargetRegistry) -> Self {
        let payload = registry.default_payload();
        Self {
            targets: registry.targets().len(),
            default_payload_chars: payload.chars().count(),
            content_length: contracts::content_length(payload),
        }
    }
}

/// Execute the `status` command
pub fn run_status(config_path: &Path, args: &StatusArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = TargetRegistry::load(&config);
    let status = Status::of(&registry);

    if args.json {
        let json = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{}", json);
    } else {
        println!("Targets: {}", status.targets);
        println!("Default payload length: {}", status.default_payload_chars);
        println!("Content-Length: {}", status.content_length);
    }

    observability::record_target_count(status.targets);
    Ok(())
}
