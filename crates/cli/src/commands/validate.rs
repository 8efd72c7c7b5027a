//! `validate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::SyncpostConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    default_timeout_secs: u64,
    request_timeout_secs: u64,
    verify_tls: bool,
    targets_file: String,
    payload_file: String,
    extra_headers: usize,
}

/// Execute the `validate` command
pub fn run_validate(config_path: &Path, args: &ValidateArgs) -> Result<()> {
    info!(config = %config_path.display(), "Validating configuration");

    let result = validate_config(config_path);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(config_path: &Path) -> ValidationResult {
    let display_path = config_path.display().to_string();

    // Check file exists
    if !config_path.exists() {
        return ValidationResult {
            valid: false,
            config_path: display_path,
            error: Some(format!("File not found: {}", config_path.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(config_path) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path: display_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    default_timeout_secs: config.dispatch.default_timeout_secs,
                    request_timeout_secs: config.dispatch.request_timeout_secs,
                    verify_tls: config.dispatch.verify_tls,
                    targets_file: config.storage.targets_file.display().to_string(),
                    payload_file: config.storage.payload_file.display().to_string(),
                    extra_headers: config.headers.extra.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path: display_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &SyncpostConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.headers.api_key == contracts::DEFAULT_API_KEY {
        warnings.push("headers.api_key is the placeholder value".to_string());
    }

    if config.dispatch.request_timeout_secs > config.dispatch.default_timeout_secs {
        warnings.push(
            "dispatch.request_timeout_secs exceeds default_timeout_secs - slow targets \
             will be reported as NoResponse"
                .to_string(),
        );
    }

    if config.registry.url_scheme == "http" {
        warnings.push("registry.url_scheme is plain http".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Timeouts: {}s aggregate, {}s per request",
                summary.default_timeout_secs, summary.request_timeout_secs
            );
            println!("  Verify TLS: {}", summary.verify_tls);
            println!("  Targets file: {}", summary.targets_file);
            println!("  Payload file: {}", summary.payload_file);
            println!("  Extra headers: {}", summary.extra_headers);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
