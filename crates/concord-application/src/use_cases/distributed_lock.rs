//! Distributed Lease Lock
//!
//! A lock object bound to one key, one random ownership token and one TTL.
//! Acquisition, release and extension each map to exactly one atomic
//! [`LockStore`] operation, and release/extend are gated on the token so a
//! holder whose lease expired can never remove or prolong a newer owner's
//! record.
//!
//! States: `Unacquired -> Held -> (Released | Expired)`. The lock is not
//! re-entrant.
//!
//! ## Example
//!
//! ```ignore
//! let lock = DistributedLock::new(store, "invoice:42", Duration::from_secs(10));
//! lock.lock(Duration::from_millis(100), &cancel).await?;
//! // critical section
//! lock.unlock().await?;
//! ```

use concord_domain::constants::LOCK_KEY_PREFIX;
use concord_domain::error::{Error, Result};
use concord_domain::ports::LockStore;
use concord_domain::token::TokenGenerator;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Lease TTL shared between a lock and its renewal task
///
/// Stored as whole nanoseconds, saturating at roughly 584 years.
#[derive(Debug)]
struct LeaseTtl(AtomicU64);

impl LeaseTtl {
    fn new(ttl: Duration) -> Self {
        Self(AtomicU64::new(Self::to_nanos(ttl)))
    }

    fn get(&self) -> Duration {
        Duration::from_nanos(self.0.load(Ordering::Acquire))
    }

    fn set(&self, ttl: Duration) {
        self.0.store(Self::to_nanos(ttl), Ordering::Release);
    }

    fn to_nanos(ttl: Duration) -> u64 {
        u64::try_from(ttl.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Lease lock on a single key of the shared store
pub struct DistributedLock {
    store: Arc<dyn LockStore>,
    key: String,
    store_key: String,
    token: String,
    ttl: Arc<LeaseTtl>,
}

impl DistributedLock {
    /// Create a lock object; the store is not contacted
    pub fn new<K: Into<String>>(store: Arc<dyn LockStore>, key: K, ttl: Duration) -> Self {
        let key = key.into();
        Self {
            store,
            store_key: format!("{LOCK_KEY_PREFIX}{key}"),
            key,
            token: TokenGenerator::generate_owner_token(),
            ttl: Arc::new(LeaseTtl::new(ttl)),
        }
    }

    /// Caller-facing key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key of the record in the shared store (`lock:<key>`)
    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    /// Ownership token of this lock object
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Current lease TTL
    pub fn ttl(&self) -> Duration {
        self.ttl.get()
    }

    /// Attempt a single acquisition
    ///
    /// # Returns
    /// True if the record was created and the lock is now held; false if the
    /// key already exists
    pub async fn try_lock(&self) -> Result<bool> {
        let ttl = self.ttl();
        let acquired = self
            .store
            .set_if_absent(&self.store_key, &self.token, ttl)
            .await?;
        if acquired {
            debug!(key = %self.key, ttl = ?ttl, "Lock acquired");
        }
        Ok(acquired)
    }

    /// Block until the lock is acquired or `cancel` fires
    ///
    /// Sleeps `retry_interval` between attempts. Waiters are not queued;
    /// whichever waiter reaches the store first after a release wins.
    pub async fn lock(&self, retry_interval: Duration, cancel: &CancellationToken) -> Result<()> {
        let mut attempts: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(Error::lock_acquisition_timeout(&self.key));
            }
            attempts += 1;
            if self.try_lock().await? {
                return Ok(());
            }
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(key = %self.key, attempts, "Lock acquisition cancelled");
                    return Err(Error::lock_acquisition_timeout(&self.key));
                }
                () = tokio::time::sleep(retry_interval) => {}
            }
        }
    }

    /// Block until the lock is acquired or `timeout` elapses
    pub async fn lock_with_timeout(&self, retry_interval: Duration, timeout: Duration) -> Result<()> {
        let never = CancellationToken::new();
        tokio::time::timeout(timeout, self.lock(retry_interval, &never))
            .await
            .map_err(|_| Error::lock_acquisition_timeout(&self.key))?
    }

    /// Release the lock if this object still owns it
    ///
    /// # Returns
    /// True if the record was deleted; false if the lock had expired or is
    /// held by another owner, in which case nothing is touched
    pub async fn unlock(&self) -> Result<bool> {
        let released = self
            .store
            .compare_and_delete(&self.store_key, &self.token)
            .await?;
        if released {
            debug!(key = %self.key, "Lock released");
        } else {
            warn!(key = %self.key, "Unlock skipped: lock not owned by this instance");
        }
        Ok(released)
    }

    /// Reset the lease to `new_ttl` if this object still owns it
    ///
    /// # Returns
    /// True if the expiry was updated (and the local TTL with it); false if
    /// the lock is no longer owned. A running renewal task picks up the new
    /// TTL on its next tick.
    pub async fn extend(&self, new_ttl: Duration) -> Result<bool> {
        let extended = extend_record(
            self.store.as_ref(),
            &self.key,
            &self.store_key,
            &self.token,
            new_ttl,
        )
        .await?;
        if extended {
            self.ttl.set(new_ttl);
        }
        Ok(extended)
    }

    /// Whether the store currently holds this object's token
    pub async fn is_locked(&self) -> Result<bool> {
        let current = self.store.get(&self.store_key).await?;
        Ok(current.as_deref() == Some(self.token.as_str()))
    }

    /// Fail with [`Error::LockNotOwned`] unless this object holds the lock
    ///
    /// Lease ownership can lapse silently (for example when renewal fails),
    /// so run this before any irreversible action inside a critical section.
    pub async fn ensure_owned(&self) -> Result<()> {
        if self.is_locked().await? {
            Ok(())
        } else {
            Err(Error::lock_not_owned(&self.key))
        }
    }

    /// Acquire the lock, then keep extending it in the background
    ///
    /// The renewal task extends the lease to the current TTL every
    /// `renewal_interval` and exits when `cancel` fires, when the returned
    /// handle is stopped or dropped, or when an extension fails. A failed
    /// renewal is only logged; check [`RenewalHandle::is_active`] or
    /// [`DistributedLock::ensure_owned`] before irreversible actions.
    pub async fn lock_with_auto_renewal(
        &self,
        retry_interval: Duration,
        renewal_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<RenewalHandle> {
        if renewal_interval.is_zero() {
            return Err(Error::invalid_argument("renewal interval must be non-zero"));
        }
        self.lock(retry_interval, cancel).await?;

        let stop = cancel.child_token();
        let task = tokio::spawn(renew_until_stopped(
            Arc::clone(&self.store),
            self.key.clone(),
            self.store_key.clone(),
            self.token.clone(),
            Arc::clone(&self.ttl),
            renewal_interval,
            stop.clone(),
        ));

        Ok(RenewalHandle {
            stop,
            task: Some(task),
        })
    }
}

impl std::fmt::Debug for DistributedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributedLock")
            .field("key", &self.key)
            .field("ttl", &self.ttl())
            .field("store", &self.store.provider_name())
            .finish_non_exhaustive()
    }
}

/// Why a renewal task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalOutcome {
    /// Stopped through the handle or the parent cancellation token
    Cancelled,
    /// The store no longer held this owner's token
    Lost,
    /// The store could not be reached
    Failed,
}

/// Handle to the background renewal task of a held lock
///
/// Dropping the handle stops renewal; the lease then expires after its TTL
/// unless released explicitly.
#[derive(Debug)]
pub struct RenewalHandle {
    stop: CancellationToken,
    task: Option<JoinHandle<RenewalOutcome>>,
}

impl RenewalHandle {
    /// Whether the renewal task is still running
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop renewing and wait for the task to exit
    pub async fn stop(mut self) -> RenewalOutcome {
        self.stop.cancel();
        match self.task.take() {
            Some(task) => task.await.unwrap_or(RenewalOutcome::Failed),
            None => RenewalOutcome::Cancelled,
        }
    }
}

impl Drop for RenewalHandle {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

async fn extend_record(
    store: &dyn LockStore,
    key: &str,
    store_key: &str,
    token: &str,
    ttl: Duration,
) -> Result<bool> {
    let extended = store.compare_and_expire(store_key, token, ttl).await?;
    if extended {
        debug!(key, ttl = ?ttl, "Lock extended");
    } else {
        warn!(key, "Extend skipped: lock not owned by this instance");
    }
    Ok(extended)
}

async fn renew_until_stopped(
    store: Arc<dyn LockStore>,
    key: String,
    store_key: String,
    token: String,
    ttl: Arc<LeaseTtl>,
    renewal_interval: Duration,
    stop: CancellationToken,
) -> RenewalOutcome {
    let mut ticker = tokio::time::interval(renewal_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; the lease was just written.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = stop.cancelled() => {
                debug!(key = %key, "Lock renewal stopped");
                return RenewalOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        match extend_record(store.as_ref(), &key, &store_key, &token, ttl.get()).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(key = %key, "Lock renewal ended: lease lost");
                return RenewalOutcome::Lost;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Lock renewal ended: store unavailable");
                return RenewalOutcome::Failed;
            }
        }
    }
}
