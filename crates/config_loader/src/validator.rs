//! Config validation
//!
//! Rules:
//! - field ranges declared on the config structs (timeouts > 0)
//! - extra header names are valid tokens and do not shadow per-target headers
//! - header values contain no control characters
//! - registry scheme is http/https, path is absolute
//! - storage paths are non-empty

use ::validator::Validate;
use contracts::{ContractError, SyncpostConfig};

/// Headers computed per target; configuring them is an error
const RESERVED_HEADERS: [&str; 4] = ["host", "content-length", "content-type", "apikey"];

/// Validate SyncpostConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &SyncpostConfig) -> Result<(), ContractError> {
    validate_declared_rules(config)?;
    validate_extra_headers(config)?;
    validate_header_values(config)?;
    validate_registry(config)?;
    validate_storage(config)?;
    Ok(())
}

/// Range/length rules from `#[validate(...)]` attributes
fn validate_declared_rules(config: &SyncpostConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let field = errors
            .errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        ContractError::config_validation(field, errors.to_string())
    })
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Extra header names: RFC 7230 token, not one of the per-target headers
fn validate_extra_headers(config: &SyncpostConfig) -> Result<(), ContractError> {
    for name in config.headers.extra.keys() {
        let field = format!("headers.extra[{name}]");
        if name.is_empty() || !name.chars().all(is_token_char) {
            return Err(ContractError::config_validation(
                field,
                "header name must be a non-empty token",
            ));
        }
        let lower = name.to_ascii_lowercase();
        if lower == "user-agent" || RESERVED_HEADERS.contains(&lower.as_str()) {
            return Err(ContractError::config_validation(
                field,
                format!("'{name}' is reserved and set by the dispatcher"),
            ));
        }
    }
    Ok(())
}

/// Header values must be sendable as-is
fn validate_header_values(config: &SyncpostConfig) -> Result<(), ContractError> {
    let headers = &config.headers;
    let values = [
        ("headers.api_key".to_string(), &headers.api_key),
        ("headers.user_agent".to_string(), &headers.user_agent),
    ]
    .into_iter()
    .chain(
        headers
            .extra
            .iter()
            .map(|(name, value)| (format!("headers.extra[{name}]"), value)),
    );

    for (field, value) in values {
        if value.chars().any(|c| c.is_control() && c != '\t') {
            return Err(ContractError::config_validation(
                field,
                "header value contains control characters",
            ));
        }
    }
    Ok(())
}

/// Registry URL template
fn validate_registry(config: &SyncpostConfig) -> Result<(), ContractError> {
    let registry = &config.registry;
    if !matches!(registry.url_scheme.as_str(), "http" | "https") {
        return Err(ContractError::config_validation(
            "registry.url_scheme",
            format!("expected 'http' or 'https', got '{}'", registry.url_scheme),
        ));
    }
    if !registry.url_path.starts_with('/') {
        return Err(ContractError::config_validation(
            "registry.url_path",
            format!("path must start with '/', got '{}'", registry.url_path),
        ));
    }
    Ok(())
}

/// Storage paths
fn validate_storage(config: &SyncpostConfig) -> Result<(), ContractError> {
    let storage = &config.storage;
    if storage.targets_file.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "storage.targets_file",
            "path cannot be empty",
        ));
    }
    if storage.payload_file.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "storage.payload_file",
            "path cannot be empty",
        ));
    }
    Ok(())
}
