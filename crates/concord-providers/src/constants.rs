//! Provider-specific constants

use std::time::Duration;

// ============================================================================
// REDIS LOCK STORE CONSTANTS
// ============================================================================

/// Redis URI used when none is configured
pub const REDIS_DEFAULT_URI: &str = "redis://localhost:6379";

/// Default bound on a single Redis round trip
pub const REDIS_DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Delete the key only while it holds the caller's token
pub const REDIS_RELEASE_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

/// Reset the key's expiry only while it holds the caller's token
pub const REDIS_EXTEND_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("expire", KEYS[1], ARGV[2])
else
    return 0
end
"#;

// ============================================================================
// POSTGRES CONSTANTS
// ============================================================================

/// Pool size used when none is configured
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Idle connections kept when none is configured
pub const POSTGRES_DEFAULT_MIN_IDLE: u32 = 1;

/// Bound on waiting for a pooled connection when none is configured
pub const POSTGRES_DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest `statement_timeout` PostgreSQL accepts, in milliseconds
pub const POSTGRES_MAX_STATEMENT_TIMEOUT_MS: u128 = 2_147_483_647;
