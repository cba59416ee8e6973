//! In-process lease store
//!
//! Records live in a [`DashMap`]; every compare-and-write happens under the
//! map's shard lock for that key, so the operations are atomic with respect
//! to each other. Expiry is evaluated lazily against `tokio::time::Instant`,
//! which lets tests drive it with a paused clock. Expired records are
//! evicted whenever an operation touches their key.

use async_trait::async_trait;
use concord_domain::error::Result;
use concord_domain::ports::{LockStore, cap_lease_ttl};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct LeaseRecord {
    token: String,
    expires_at: Instant,
}

impl LeaseRecord {
    fn new(token: &str, now: Instant, ttl: Duration) -> Self {
        Self {
            token: token.to_string(),
            expires_at: deadline(now, ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    fn is_held_by(&self, token: &str, now: Instant) -> bool {
        self.is_live(now) && self.token == token
    }
}

fn deadline(now: Instant, ttl: Duration) -> Instant {
    now + cap_lease_ttl(ttl)
}

/// [`LockStore`] local to one process
///
/// TTLs are applied exactly, without rounding to whole seconds, and capped
/// at one year.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLockStore {
    records: Arc<DashMap<String, LeaseRecord>>,
}

impl InMemoryLockStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.records.iter().filter(|r| r.is_live(now)).count()
    }

    /// Whether the store holds no live record
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired records
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.records.retain(|_, record| record.is_live(now));
    }

    fn evict_expired(&self, key: &str, now: Instant) {
        self.records.remove_if(key, |_, record| !record.is_live(now));
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        match self.records.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    Ok(false)
                } else {
                    occupied.insert(LeaseRecord::new(token, now, ttl));
                    Ok(true)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(LeaseRecord::new(token, now, ttl));
                Ok(true)
            }
        }
    }

    async fn compare_and_delete(&self, key: &str, token: &str) -> Result<bool> {
        let now = Instant::now();
        // An expired record is removed whoever asks, but only counts as a
        // release for its owner while still live.
        Ok(self
            .records
            .remove_if(key, |_, record| !record.is_live(now) || record.token == token)
            .is_some_and(|(_, record)| record.is_held_by(token, now)))
    }

    async fn compare_and_expire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        match self.records.get_mut(key) {
            Some(mut record) if record.is_held_by(token, now) => {
                record.expires_at = deadline(now, ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        self.evict_expired(key, now);
        Ok(self
            .records
            .get(key)
            .filter(|record| record.is_live(now))
            .map(|record| record.token.clone()))
    }

    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>> {
        let now = Instant::now();
        self.evict_expired(key, now);
        Ok(self
            .records
            .get(key)
            .filter(|record| record.is_live(now))
            .map(|record| record.expires_at.saturating_duration_since(now)))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use concord_application::ports::registry::{
    LOCK_STORE_PROVIDERS, LockStoreProviderConfig, LockStoreProviderEntry,
};

fn memory_lock_store_factory(
    _config: &LockStoreProviderConfig,
) -> std::result::Result<Arc<dyn LockStore>, String> {
    Ok(Arc::new(InMemoryLockStore::new()))
}

#[linkme::distributed_slice(LOCK_STORE_PROVIDERS)]
static MEMORY_LOCK_STORE: LockStoreProviderEntry = LockStoreProviderEntry {
    name: "memory",
    description: "In-process lease store (single instance only)",
    factory: memory_lock_store_factory,
};
