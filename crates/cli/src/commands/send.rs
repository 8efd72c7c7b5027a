//! `send` and `send-data` command implementations.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use contracts::BroadcastOutcome;
use dispatcher::{create_http_dispatcher, DispatchError};
use registry::{extract_payload, TargetRegistry};
use tracing::{info, warn};

use super::load_config;
use crate::cli::{DispatchOptions, SendArgs, SendDataArgs};
use crate::report::format_report;

/// Execute the `send` command
pub async fn run_send(config_path: &Path, args: &SendArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = TargetRegistry::load(&config);

    if registry.default_payload().is_empty() {
        warn!("Default payload is empty; sending `data=` only");
    }

    let dispatcher =
        create_http_dispatcher(&config, registry.snapshot(), registry.default_payload())
            .context("Failed to create dispatcher")?;

    let timeout = aggregate_timeout(&args.options)?;
    info!(targets = dispatcher.targets().len(), "Sending default payload");
    let outcome = finish(dispatcher.dispatch_default(timeout).await)?;
    print_outcome(&outcome, &args.options)
}

/// Execute the `send-data` command
pub async fn run_send_data(config_path: &Path, args: &SendDataArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = TargetRegistry::load(&config);

    let extracted = extract_payload(&args.text.join(" "));
    let payload = payload_or_default(&extracted, registry.default_payload());
    info!(
        preview = %payload.chars().take(400).collect::<String>(),
        "Sending provided payload"
    );

    let dispatcher =
        create_http_dispatcher(&config, registry.snapshot(), registry.default_payload())
            .context("Failed to create dispatcher")?;

    let timeout = aggregate_timeout(&args.options)?;
    let outcome = finish(dispatcher.dispatch(payload, timeout).await)?;
    print_outcome(&outcome, &args.options)
}

/// Extracted text, or the default payload when extraction left nothing
fn payload_or_default<'a>(extracted: &'a str, default: &'a str) -> &'a str {
    if extracted.is_empty() {
        default
    } else {
        extracted
    }
}

fn aggregate_timeout(options: &DispatchOptions) -> Result<Option<Duration>> {
    match options.timeout {
        Some(0) => anyhow::bail!("--timeout must be at least 1 second"),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}

fn finish(result: Result<BroadcastOutcome, DispatchError>) -> Result<BroadcastOutcome> {
    match result {
        Ok(outcome) => Ok(outcome),
        Err(DispatchError::NoTargets) => {
            anyhow::bail!("No targets configured; add one with `syncpost targets add <HOST>`")
        }
        Err(e) => Err(e).context("Broadcast failed"),
    }
}

fn print_outcome(outcome: &BroadcastOutcome, options: &DispatchOptions) -> Result<()> {
    if options.json {
        let json =
            serde_json::to_string_pretty(outcome).context("Failed to serialize broadcast outcome")?;
        println!("{}", json);
    } else {
        print!("{}", format_report(outcome));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_or_default() {
        assert_eq!(payload_or_default("abc", "def"), "abc");
        assert_eq!(payload_or_default("", "def"), "def");
    }

    #[test]
    fn test_aggregate_timeout() {
        let options = |timeout| DispatchOptions {
            timeout,
            json: false,
        };
        assert_eq!(aggregate_timeout(&options(None)).unwrap(), None);
        assert_eq!(
            aggregate_timeout(&options(Some(5))).unwrap(),
            Some(Duration::from_secs(5))
        );
        assert!(aggregate_timeout(&options(Some(0))).is_err());
    }

    #[test]
    fn test_finish_maps_no_targets() {
        let err = finish(Err(DispatchError::NoTargets)).unwrap_err();
        assert!(err.to_string().contains("No targets configured"));
    }
}
