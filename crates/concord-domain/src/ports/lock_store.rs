//! Lock Store Port
//!
//! Contract for the shared store backing lease locks. Every mutation is a
//! single atomic step on the store side: create-if-absent, compare-and-delete
//! and compare-and-extend. Implementations must never split these into a
//! read followed by a write.

use crate::constants::{LOCK_MAX_TTL_SECS, LOCK_MIN_TTL_SECS};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Shared store holding `key -> owner token` records with expiry
///
/// # Implementations
///
/// - **Redis**: `SET NX EX` plus Lua scripts for the compare operations
/// - **InMemory**: single-process store for tests and embedded use
/// - **Null**: refuses every acquisition
#[async_trait]
pub trait LockStore: Send + Sync + std::fmt::Debug {
    /// Create `key` holding `token` with `ttl` if and only if `key` is absent
    ///
    /// # Returns
    /// True if the record was created
    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> Result<bool>;

    /// Delete `key` only if it currently holds `token`
    ///
    /// # Returns
    /// True if the record was deleted
    async fn compare_and_delete(&self, key: &str, token: &str) -> Result<bool>;

    /// Reset the expiry of `key` to `ttl` only if it currently holds `token`
    ///
    /// # Returns
    /// True if the expiry was updated
    async fn compare_and_expire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool>;

    /// Current value of `key`, None if absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remaining time to live of `key`, None if absent or without expiry
    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>>;

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}

/// Convert a TTL to the whole seconds a store applies
///
/// Sub-second remainders round to the nearest second; the result lies in
/// `[LOCK_MIN_TTL_SECS, LOCK_MAX_TTL_SECS]`.
pub fn ttl_to_store_secs(ttl: Duration) -> u64 {
    let rounded = ttl
        .as_secs()
        .saturating_add(u64::from(ttl.subsec_millis() >= 500));
    rounded.clamp(LOCK_MIN_TTL_SECS, LOCK_MAX_TTL_SECS)
}

/// Cap a lease TTL at [`LOCK_MAX_TTL_SECS`]
///
/// Stores that keep their own deadlines use this so `now + ttl` cannot
/// overflow.
pub fn cap_lease_ttl(ttl: Duration) -> Duration {
    ttl.min(Duration::from_secs(LOCK_MAX_TTL_SECS))
}
