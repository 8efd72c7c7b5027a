//! File-backed stores for the target list and the default payload

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use contracts::{RegistryConfig, Target};
use tracing::{debug, info, instrument, warn};

use crate::error::RegistryError;

const BOOTSTRAP_HOSTS: [&str; 3] = ["alpha.example.com", "bravo.example.net", "charlie.example.org"];

/// Sample targets used when no usable target list is stored
pub fn bootstrap_targets(registry: &RegistryConfig) -> Vec<Target> {
    BOOTSTRAP_HOSTS
        .iter()
        .map(|host| Target::from_host(host, &registry.url_scheme, &registry.url_path))
        .collect()
}

/// Write through a sibling temp file so a crash never leaves a torn store
fn write_replace(path: &Path, content: &str) -> Result<(), RegistryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content).map_err(|e| RegistryError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| RegistryError::io(path, e))
}

/// JSON array of targets on disk
#[derive(Debug, Clone)]
pub struct TargetStore {
    path: PathBuf,
}

impl TargetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list; `Ok(None)` if the file does not exist
    pub fn try_load(&self) -> Result<Option<Vec<Target>>, RegistryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RegistryError::io(&self.path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| RegistryError::format(&self.path, e))
    }

    /// Load targets, falling back to the bootstrap set
    ///
    /// A missing, unreadable, corrupt or empty store all yield the bootstrap set.
    #[instrument(name = "target_store_load", skip(self, registry), fields(path = %self.path.display()))]
    pub fn load(&self, registry: &RegistryConfig) -> Vec<Target> {
        match self.try_load() {
            Ok(Some(targets)) if !targets.is_empty() => {
                debug!(count = targets.len(), "Targets loaded");
                targets
            }
            Ok(_) => {
                info!("No stored targets, using bootstrap set");
                bootstrap_targets(registry)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load targets, using bootstrap set");
                bootstrap_targets(registry)
            }
        }
    }

    /// Persist the full list (pretty JSON, non-ASCII kept as-is)
    #[instrument(name = "target_store_save", skip(self, targets), fields(path = %self.path.display(), count = targets.len()))]
    pub fn save(&self, targets: &[Target]) -> Result<(), RegistryError> {
        let content = serde_json::to_string_pretty(targets)
            .map_err(|e| RegistryError::format(&self.path, e))?;
        write_replace(&self.path, &content)?;
        debug!("Targets saved");
        Ok(())
    }
}

/// Plain-text default payload on disk
#[derive(Debug, Clone)]
pub struct PayloadStore {
    path: PathBuf,
}

impl PayloadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed stored payload; `None` if missing, unreadable or blank
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read payload store");
                None
            }
        }
    }

    pub fn save(&self, payload: &str) -> Result<(), RegistryError> {
        write_replace(&self.path, payload)
    }
}
