//! TargetRegistry - owned target list and default payload

use contracts::{content_length, RegistryConfig, StorageConfig, SyncpostConfig, Target};
use tracing::{error, info, instrument};

use crate::error::RegistryError;
use crate::store::{PayloadStore, TargetStore};

/// Target list plus default payload, persisted on every mutation
///
/// Hand a `snapshot()` to the dispatcher; mutations never touch a
/// dispatch already in flight.
#[derive(Debug)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    default_payload: String,
    target_store: TargetStore,
    payload_store: PayloadStore,
    registry: RegistryConfig,
}

impl TargetRegistry {
    /// Load from the configured stores
    ///
    /// Default payload precedence: payload store, then `bootstrap.default_payload`,
    /// then empty.
    pub fn load(config: &SyncpostConfig) -> Self {
        Self::load_from(
            &config.storage,
            config.registry.clone(),
            config.bootstrap.default_payload.as_deref(),
        )
    }

    /// Load from explicit storage locations
    #[instrument(name = "registry_load", skip_all)]
    pub fn load_from(
        storage: &StorageConfig,
        registry: RegistryConfig,
        bootstrap_payload: Option<&str>,
    ) -> Self {
        let target_store = TargetStore::new(&storage.targets_file);
        let payload_store = PayloadStore::new(&storage.payload_file);

        let targets = target_store.load(&registry);
        let default_payload = payload_store
            .load()
            .or_else(|| bootstrap_payload.map(str::to_string))
            .unwrap_or_default();

        info!(
            targets = targets.len(),
            payload_len = default_payload.len(),
            "Registry loaded"
        );

        Self {
            targets,
            default_payload,
            target_store,
            payload_store,
            registry,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Owned copy for one dispatch
    pub fn snapshot(&self) -> Vec<Target> {
        self.targets.clone()
    }

    pub fn default_payload(&self) -> &str {
        &self.default_payload
    }

    /// Add a target by bare host name
    ///
    /// # Errors
    /// Rejects empty hosts and hosts containing whitespace or `/`.
    pub fn add_host(&mut self, host: &str) -> Result<Target, RegistryError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(RegistryError::invalid_host(host, "host cannot be empty"));
        }
        if host.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(RegistryError::invalid_host(
                host,
                "host cannot contain whitespace or '/'",
            ));
        }

        let target = Target::from_host(host, &self.registry.url_scheme, &self.registry.url_path);
        self.add_target(target.clone());
        Ok(target)
    }

    /// Append a fully specified target
    pub fn add_target(&mut self, target: Target) {
        info!(name = %target.name, url = %target.url, "Target added");
        self.targets.push(target);
        self.persist_targets();
    }

    /// Remove by zero-based index; `None` (and nothing persisted) if out of range
    pub fn remove_at(&mut self, index: usize) -> Option<Target> {
        if index >= self.targets.len() {
            return None;
        }
        let removed = self.targets.remove(index);
        info!(index, name = %removed.name, "Target removed");
        self.persist_targets();
        Some(removed)
    }

    /// Replace the default payload and persist it
    pub fn set_default_payload(&mut self, payload: impl Into<String>) {
        self.default_payload = payload.into();
        if let Err(e) = self.payload_store.save(&self.default_payload) {
            error!(error = %e, "Failed to save default payload");
        }
        info!(
            content_length = content_length(&self.default_payload),
            "Default payload updated"
        );
    }

    fn persist_targets(&self) {
        if let Err(e) = self.target_store.save(&self.targets) {
            error!(error = %e, "Failed to save targets");
        }
    }
}
