//! Redis lease store
//!
//! Acquisition is a single `SET key token NX EX ttl`; release and extension
//! run as Lua scripts so the token comparison and the write happen as one
//! atomic step on the server.
//!
//! ## Example
//!
//! ```ignore
//! use concord_providers::lock_store::RedisLockStore;
//!
//! let store = RedisLockStore::new("redis://localhost:6379")?;
//! ```

use crate::constants::{
    REDIS_DEFAULT_OPERATION_TIMEOUT, REDIS_DEFAULT_URI, REDIS_EXTEND_SCRIPT, REDIS_RELEASE_SCRIPT,
};
use async_trait::async_trait;
use concord_domain::error::{Error, Result};
use concord_domain::ports::{LockStore, ttl_to_store_secs};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult, Script};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Redis-backed [`LockStore`]
///
/// Holds one reconnecting multiplexed connection, opened on first use.
#[derive(Clone)]
pub struct RedisLockStore {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    operation_timeout: Duration,
    release_script: Script,
    extend_script: Script,
}

impl RedisLockStore {
    /// Create a store for `connection_string` (e.g. `redis://localhost:6379`)
    ///
    /// No connection is made until the first operation.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::lock_store_unavailable_with_source(
                format!("Failed to create Redis client: {e}"),
                e,
            )
        })?;

        Ok(Self {
            client,
            connection: Arc::new(OnceCell::new()),
            operation_timeout: REDIS_DEFAULT_OPERATION_TIMEOUT,
            release_script: Script::new(REDIS_RELEASE_SCRIPT),
            extend_script: Script::new(REDIS_EXTEND_SCRIPT),
        })
    }

    /// Bound every round trip by `timeout`
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Bound applied to every round trip
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    async fn get_connection(&self) -> Result<ConnectionManager> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                tokio::time::timeout(
                    self.operation_timeout,
                    ConnectionManager::new(self.client.clone()),
                )
                .await
                .map_err(|_| Error::lock_store_unavailable("Timed out connecting to Redis"))?
                .map_err(|e| {
                    Error::lock_store_unavailable_with_source(
                        format!("Failed to get Redis connection: {e}"),
                        e,
                    )
                })
            })
            .await?;
        Ok(connection.clone())
    }

    async fn run<T, F>(&self, command: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::lock_store_unavailable_with_source(
                format!("Redis {command} failed: {e}"),
                e,
            )),
            Err(_) => Err(Error::lock_store_unavailable(format!(
                "Redis {command} timed out after {:?}",
                self.operation_timeout
            ))),
        }
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn set_if_absent(&self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let reply: Option<String> = self
            .run(
                "SET NX",
                redis::cmd("SET")
                    .arg(key)
                    .arg(token)
                    .arg("NX")
                    .arg("EX")
                    .arg(ttl_to_store_secs(ttl))
                    .query_async(&mut conn),
            )
            .await?;
        Ok(reply.is_some())
    }

    async fn compare_and_delete(&self, key: &str, token: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let deleted: i64 = self
            .run(
                "release script",
                self.release_script
                    .key(key)
                    .arg(token)
                    .invoke_async(&mut conn),
            )
            .await?;
        Ok(deleted == 1)
    }

    async fn compare_and_expire(&self, key: &str, token: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let extended: i64 = self
            .run(
                "extend script",
                self.extend_script
                    .key(key)
                    .arg(token)
                    .arg(ttl_to_store_secs(ttl))
                    .invoke_async(&mut conn),
            )
            .await?;
        Ok(extended == 1)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        self.run("GET", conn.get::<_, Option<String>>(key)).await
    }

    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>> {
        let mut conn = self.get_connection().await?;
        let millis: i64 = self
            .run("PTTL", redis::cmd("PTTL").arg(key).query_async(&mut conn))
            .await?;
        // -2: key absent, -1: key without expiry
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisLockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLockStore")
            .field("connected", &self.connection.initialized())
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use concord_application::ports::registry::{
    LOCK_STORE_PROVIDERS, LockStoreProviderConfig, LockStoreProviderEntry,
};

fn redis_lock_store_factory(
    config: &LockStoreProviderConfig,
) -> std::result::Result<Arc<dyn LockStore>, String> {
    let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URI);

    let mut store =
        RedisLockStore::new(uri).map_err(|e| format!("Failed to create Redis lock store: {e}"))?;
    if let Some(timeout) = config.operation_timeout {
        store = store.with_operation_timeout(timeout);
    }

    Ok(Arc::new(store))
}

#[linkme::distributed_slice(LOCK_STORE_PROVIDERS)]
static REDIS_LOCK_STORE: LockStoreProviderEntry = LockStoreProviderEntry {
    name: "redis",
    description: "Redis lease store (SET NX EX + Lua compare scripts)",
    factory: redis_lock_store_factory,
};
