//! Lock Store Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`RedisLockStore`] | Distributed | Redis-backed, shared across processes |
//! | [`InMemoryLockStore`] | Local | Single-process store for tests and embedded use |
//! | [`NullLockStore`] | Testing | Refuses every acquisition |

pub mod memory;
pub mod null;
#[cfg(feature = "lock-redis")]
pub mod redis;

pub use memory::InMemoryLockStore;
pub use null::NullLockStore;
#[cfg(feature = "lock-redis")]
pub use redis::RedisLockStore;
