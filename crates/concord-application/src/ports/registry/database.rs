//! Database Provider Registry
//!
//! Transaction factories register themselves into [`DATABASE_PROVIDERS`] and
//! are selected at runtime by the `database.provider` configuration value.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use concord_domain::ports::TransactionFactory;

/// Configuration for transaction factory creation
#[derive(Debug, Clone, Default)]
pub struct DatabaseProviderConfig {
    /// Provider name (e.g., "postgres", "null")
    pub provider: String,
    /// Connection URL
    pub url: Option<String>,
    /// Maximum pooled connections
    pub max_connections: Option<u32>,
    /// Minimum idle pooled connections
    pub min_idle: Option<u32>,
    /// Maximum lifetime of a pooled connection
    pub max_lifetime: Option<Duration>,
    /// Idle time after which a pooled connection is closed
    pub idle_timeout: Option<Duration>,
    /// Bound on waiting for a pooled connection
    pub connection_timeout: Option<Duration>,
    /// Additional provider-specific configuration
    pub extra: HashMap<String, String>,
}

impl DatabaseProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the connection URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the pool bounds
    pub fn with_pool_size(mut self, max_connections: u32, min_idle: u32) -> Self {
        self.max_connections = Some(max_connections);
        self.min_idle = Some(min_idle);
        self
    }

    /// Set the connection lifetimes
    pub fn with_lifetimes(mut self, max_lifetime: Duration, idle_timeout: Duration) -> Self {
        self.max_lifetime = Some(max_lifetime);
        self.idle_timeout = Some(idle_timeout);
        self
    }

    /// Set the connection checkout timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Add extra configuration
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for database providers
pub struct DatabaseProviderEntry {
    /// Unique provider name (e.g., "postgres", "null")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&DatabaseProviderConfig) -> Result<Arc<dyn TransactionFactory>, String>,
}

#[linkme::distributed_slice]
pub static DATABASE_PROVIDERS: [DatabaseProviderEntry] = [..];

/// Resolve a transaction factory by name from the registry
pub fn resolve_database(
    config: &DatabaseProviderConfig,
) -> Result<Arc<dyn TransactionFactory>, String> {
    let provider_name = &config.provider;

    if let Some(entry) = DATABASE_PROVIDERS
        .iter()
        .find(|entry| entry.name == provider_name)
    {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = DATABASE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown database provider '{provider_name}'. Available providers: {available:?}"
    ))
}

/// List all registered database providers as (name, description) pairs
pub fn list_databases() -> Vec<(&'static str, &'static str)> {
    DATABASE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
