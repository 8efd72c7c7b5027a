//! Command implementations.

mod payload;
mod send;
mod status;
mod targets;
mod validate;

pub use payload::run_payload;
pub use send::{run_send, run_send_data};
pub use status::run_status;
pub use targets::run_targets;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::SyncpostConfig;
use tracing::{info, warn};

/// Load the config file, or the built-in defaults when it does not exist
pub(crate) fn load_config(path: &Path) -> Result<SyncpostConfig> {
    if !path.exists() {
        warn!(config = %path.display(), "Configuration file not found, using defaults");
        return Ok(SyncpostConfig::default());
    }

    let config = config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    info!(config = %path.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.dispatch.default_timeout_secs, 60);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dispatch]\ndefault_timeout_secs = 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load config"));
    }
}
