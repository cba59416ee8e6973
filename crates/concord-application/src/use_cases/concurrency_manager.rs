//! Concurrency Façade
//!
//! Single-call coordination patterns for callers that should not manage lock
//! or transaction lifecycles themselves. The manager is constructed
//! explicitly (see `concord_infrastructure::bootstrap`) and passed to the
//! code that needs it.

use super::db_lock_manager::DatabaseLockManager;
use super::distributed_lock::{DistributedLock, RenewalHandle};
use super::transaction_manager::TransactionManager;
use concord_domain::constants::{
    DEFAULT_LOCK_RENEWAL_INTERVAL_MS, DEFAULT_LOCK_RETRY_INTERVAL_MS, DEFAULT_LOCK_TTL_SECS,
    DEFAULT_OPTIMISTIC_MAX_RETRIES,
};
use concord_domain::entities::Versioned;
use concord_domain::error::{Error, Result};
use concord_domain::ports::{LockStore, SqlTransaction};
use concord_domain::value_objects::{LockType, SqlValue, TransactionOptions};
use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Tunables of the façade patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencySettings {
    /// Sleep between blocking acquire attempts
    pub lock_retry_interval: Duration,
    /// Period of background lease extension
    pub renewal_interval: Duration,
    /// TTL used by [`ConcurrencyManager::new_default_lock`]
    pub default_lock_ttl: Duration,
    /// Retries after an optimistic conflict before giving up
    pub optimistic_max_retries: u32,
}

impl Default for ConcurrencySettings {
    fn default() -> Self {
        Self {
            lock_retry_interval: Duration::from_millis(DEFAULT_LOCK_RETRY_INTERVAL_MS),
            renewal_interval: Duration::from_millis(DEFAULT_LOCK_RENEWAL_INTERVAL_MS),
            default_lock_ttl: Duration::from_secs(DEFAULT_LOCK_TTL_SECS),
            optimistic_max_retries: DEFAULT_OPTIMISTIC_MAX_RETRIES,
        }
    }
}

/// Composes lease locks, row locks and transactions
#[derive(Debug, Clone)]
pub struct ConcurrencyManager {
    lock_store: Arc<dyn LockStore>,
    transactions: TransactionManager,
    db_locks: DatabaseLockManager,
    settings: ConcurrencySettings,
}

impl ConcurrencyManager {
    /// Create a manager with injected collaborators
    pub fn new(
        lock_store: Arc<dyn LockStore>,
        transactions: TransactionManager,
        settings: ConcurrencySettings,
    ) -> Self {
        Self {
            lock_store,
            transactions,
            db_locks: DatabaseLockManager::new(),
            settings,
        }
    }

    /// Shared lease store
    pub fn lock_store(&self) -> &Arc<dyn LockStore> {
        &self.lock_store
    }

    /// Transaction manager
    pub fn transactions(&self) -> &TransactionManager {
        &self.transactions
    }

    /// Database lock manager
    pub fn db_locks(&self) -> &DatabaseLockManager {
        &self.db_locks
    }

    /// Façade tunables
    pub fn settings(&self) -> &ConcurrencySettings {
        &self.settings
    }

    /// New, unacquired lease lock on `key`
    pub fn new_lock<K: Into<String>>(&self, key: K, ttl: Duration) -> DistributedLock {
        DistributedLock::new(Arc::clone(&self.lock_store), key, ttl)
    }

    /// New lease lock on `key` with the configured default TTL
    pub fn new_default_lock<K: Into<String>>(&self, key: K) -> DistributedLock {
        self.new_lock(key, self.settings.default_lock_ttl)
    }

    /// Acquire the lease lock on `key` and keep it renewed in the background
    ///
    /// Renewal runs every `renewal_interval` until the handle is stopped or
    /// dropped, or `cancel` fires. The lock is returned so the caller can
    /// release it once done.
    pub async fn lock_with_renewal<K: Into<String>>(
        &self,
        key: K,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<(DistributedLock, RenewalHandle)> {
        let lock = self.new_lock(key, ttl);
        let renewal = lock
            .lock_with_auto_renewal(
                self.settings.lock_retry_interval,
                self.settings.renewal_interval,
                cancel,
            )
            .await?;
        Ok((lock, renewal))
    }

    /// Run `f` while holding the lease lock on `key`
    ///
    /// Blocks until the lock is acquired or `cancel` fires. Release is always
    /// attempted afterwards, whether `f` succeeds, fails or panics; a failed
    /// release is logged and left to TTL expiry.
    pub async fn with_distributed_lock<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        cancel: &CancellationToken,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let lock = self.new_lock(key, ttl);
        lock.lock(self.settings.lock_retry_interval, cancel).await?;

        let outcome = AssertUnwindSafe(async move { f().await })
            .catch_unwind()
            .await;

        if let Err(e) = lock.unlock().await {
            warn!(key, error = %e, "Lock release failed; lease will expire");
        }

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Run `f` in a transaction after locking the matching rows of `table`
    pub fn with_pessimistic_lock<T, F>(
        &self,
        table: &str,
        lock_type: LockType,
        where_clause: &str,
        args: &[SqlValue],
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut dyn SqlTransaction) -> Result<T>,
    {
        self.transactions
            .transaction(TransactionOptions::new(), |tx| {
                self.db_locks
                    .acquire_pessimistic_lock(tx, table, lock_type, where_clause, args)?;
                f(tx)
            })
    }

    /// Read-modify-write of the `R` with `primary_key`, gated on its version
    ///
    /// `f` receives the current record and returns the column updates. On
    /// [`Error::OptimisticConflict`] the cycle is retried with a fresh read up
    /// to `optimistic_max_retries` times.
    ///
    /// # Returns
    /// The record as last read, carrying its new version; the column updates
    /// are not applied to it
    pub fn with_optimistic_lock<R, F>(&self, primary_key: SqlValue, mut f: F) -> Result<R>
    where
        R: Versioned,
        F: FnMut(&R) -> Result<Vec<(&'static str, SqlValue)>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let result = self.transactions.transaction(TransactionOptions::new(), |tx| {
                let mut record = self
                    .db_locks
                    .find_by_primary_key::<R>(tx, primary_key.clone())?
                    .ok_or_else(|| Error::not_found(format!("{} {primary_key}", R::TABLE)))?;
                let expected_version = record.version();
                let updates = f(&record)?;
                self.db_locks
                    .optimistic_lock_update(tx, &mut record, expected_version, &updates)?;
                Ok(record)
            });

            match result {
                Err(e) if e.is_conflict() && attempt < self.settings.optimistic_max_retries => {
                    attempt += 1;
                    debug!(table = R::TABLE, attempt, "Optimistic conflict; retrying");
                }
                other => return other,
            }
        }
    }
}
