//! Null lease store
//!
//! Holds nothing and grants nothing: every acquisition reports the key as
//! taken and every compare operation reports a token mismatch. Useful to
//! disable distributed locking in tests.

use async_trait::async_trait;
use concord_domain::error::Result;
use concord_domain::ports::LockStore;
use std::sync::Arc;
use std::time::Duration;

/// [`LockStore`] that refuses every acquisition
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLockStore;

impl NullLockStore {
    /// Create a new null store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LockStore for NullLockStore {
    async fn set_if_absent(&self, _key: &str, _token: &str, _ttl: Duration) -> Result<bool> {
        Ok(false)
    }

    async fn compare_and_delete(&self, _key: &str, _token: &str) -> Result<bool> {
        Ok(false)
    }

    async fn compare_and_expire(&self, _key: &str, _token: &str, _ttl: Duration) -> Result<bool> {
        Ok(false)
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn remaining_ttl(&self, _key: &str) -> Result<Option<Duration>> {
        Ok(None)
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

use concord_application::ports::registry::{
    LOCK_STORE_PROVIDERS, LockStoreProviderConfig, LockStoreProviderEntry,
};

fn null_lock_store_factory(
    _config: &LockStoreProviderConfig,
) -> std::result::Result<Arc<dyn LockStore>, String> {
    Ok(Arc::new(NullLockStore::new()))
}

#[linkme::distributed_slice(LOCK_STORE_PROVIDERS)]
static NULL_LOCK_STORE: LockStoreProviderEntry = LockStoreProviderEntry {
    name: "null",
    description: "Lease store that refuses every acquisition",
    factory: null_lock_store_factory,
};
