//! Lease lock configuration types

use crate::constants::{DEFAULT_LOCK_OPERATION_TIMEOUT_MS, DEFAULT_LOCK_PROVIDER};
use concord_application::ports::registry::LockStoreProviderConfig;
use concord_domain::constants::{
    DEFAULT_LOCK_RENEWAL_INTERVAL_MS, DEFAULT_LOCK_RETRY_INTERVAL_MS, DEFAULT_LOCK_TTL_SECS,
    DEFAULT_OPTIMISTIC_MAX_RETRIES,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Lease lock and lock store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LockConfig {
    /// Lock store provider name (e.g., "redis", "memory")
    #[validate(length(min = 1))]
    pub provider: String,

    /// Store connection URI (e.g., `redis://localhost:6379`)
    pub url: Option<String>,

    /// TTL of locks created without an explicit one, in seconds
    #[validate(range(min = 1))]
    pub default_ttl_secs: u64,

    /// Sleep between blocking acquire attempts, in milliseconds
    #[validate(range(min = 1))]
    pub retry_interval_ms: u64,

    /// Period of background lease extension, in milliseconds
    #[validate(range(min = 1))]
    pub renewal_interval_ms: u64,

    /// Bound on a single store round trip, in milliseconds
    #[validate(range(min = 1))]
    pub operation_timeout_ms: u64,

    /// Retries after an optimistic conflict before giving up
    pub optimistic_max_retries: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_LOCK_PROVIDER.to_string(),
            url: None,
            default_ttl_secs: DEFAULT_LOCK_TTL_SECS,
            retry_interval_ms: DEFAULT_LOCK_RETRY_INTERVAL_MS,
            renewal_interval_ms: DEFAULT_LOCK_RENEWAL_INTERVAL_MS,
            operation_timeout_ms: DEFAULT_LOCK_OPERATION_TIMEOUT_MS,
            optimistic_max_retries: DEFAULT_OPTIMISTIC_MAX_RETRIES,
        }
    }
}

impl LockConfig {
    /// Default lease TTL
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Sleep between blocking acquire attempts
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Period of background lease extension
    pub fn renewal_interval(&self) -> Duration {
        Duration::from_millis(self.renewal_interval_ms)
    }

    /// Bound on a single store round trip
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Registry lookup configuration for the lock store
    pub fn to_provider_config(&self) -> LockStoreProviderConfig {
        let mut config = LockStoreProviderConfig::new(self.provider.clone())
            .with_operation_timeout(self.operation_timeout());
        if let Some(url) = &self.url {
            config = config.with_uri(url.clone());
        }
        config
    }
}
