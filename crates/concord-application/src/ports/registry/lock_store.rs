//! Lock Store Provider Registry
//!
//! Lease stores register themselves into [`LOCK_STORE_PROVIDERS`] and are
//! selected at runtime by the `lock.provider` configuration value.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use concord_domain::ports::LockStore;

/// Configuration for lock store creation
///
/// Providers use what they need and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct LockStoreProviderConfig {
    /// Provider name (e.g., "redis", "memory", "null")
    pub provider: String,
    /// Connection URI (for networked stores)
    pub uri: Option<String>,
    /// Bound on each store round trip
    pub operation_timeout: Option<Duration>,
    /// Additional provider-specific configuration
    pub extra: HashMap<String, String>,
}

impl LockStoreProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the per-operation timeout
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Add extra configuration
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for lock store providers
pub struct LockStoreProviderEntry {
    /// Unique provider name (e.g., "redis", "memory", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&LockStoreProviderConfig) -> Result<Arc<dyn LockStore>, String>,
}

#[linkme::distributed_slice]
pub static LOCK_STORE_PROVIDERS: [LockStoreProviderEntry] = [..];

/// Resolve a lock store by name from the registry
///
/// # Returns
/// * `Ok(Arc<dyn LockStore>)` - Created store
/// * `Err(String)` - Unknown provider or factory failure
pub fn resolve_lock_store(config: &LockStoreProviderConfig) -> Result<Arc<dyn LockStore>, String> {
    let provider_name = &config.provider;

    if let Some(entry) = LOCK_STORE_PROVIDERS
        .iter()
        .find(|entry| entry.name == provider_name)
    {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = LOCK_STORE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown lock store provider '{provider_name}'. Available providers: {available:?}"
    ))
}

/// List all registered lock stores as (name, description) pairs
pub fn list_lock_stores() -> Vec<(&'static str, &'static str)> {
    LOCK_STORE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
