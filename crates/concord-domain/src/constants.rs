//! Domain layer constants
//!
//! Values that define the shape of lock records and SQL statements. Tunable
//! runtime defaults (retry intervals, pool sizes) live in
//! `concord_infrastructure::constants`.

// ============================================================================
// LEASE LOCK CONSTANTS
// ============================================================================

/// Prefix applied to every caller key in the shared store
pub const LOCK_KEY_PREFIX: &str = "lock:";

/// Length of the random ownership token
pub const LOCK_TOKEN_LENGTH: usize = 32;

/// Smallest TTL the store is asked to apply, in seconds
pub const LOCK_MIN_TTL_SECS: u64 = 1;

/// Largest TTL the store is asked to apply, in seconds (one year)
pub const LOCK_MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

// ============================================================================
// SQL IDENTIFIER CONSTANTS
// ============================================================================

/// Maximum accepted length of a table or column identifier
pub const IDENTIFIER_MAX_LENGTH: usize = 64;

/// Statement keywords that are never accepted as identifiers
pub const IDENTIFIER_KEYWORD_BLACKLIST: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "EXEC",
    "EXECUTE", "UNION", "GRANT", "REVOKE",
];

// ============================================================================
// VERSIONED RECORD CONSTANTS
// ============================================================================

/// Version assigned to a freshly inserted record
pub const INITIAL_RECORD_VERSION: i64 = 1;

/// Default name of the version column
pub const DEFAULT_VERSION_COLUMN: &str = "version";

/// Default name of the primary key column
pub const DEFAULT_PRIMARY_KEY_COLUMN: &str = "id";

// ============================================================================
// COORDINATION DEFAULTS
// ============================================================================

/// Default lease TTL in seconds
pub const DEFAULT_LOCK_TTL_SECS: u64 = 30;

/// Default sleep between blocking acquire attempts, in milliseconds
pub const DEFAULT_LOCK_RETRY_INTERVAL_MS: u64 = 100;

/// Default auto-renewal period, in milliseconds
pub const DEFAULT_LOCK_RENEWAL_INTERVAL_MS: u64 = 10_000;

/// Default bound on a whole transaction, in seconds
pub const DEFAULT_TRANSACTION_TIMEOUT_SECS: u64 = 30;

/// Default number of retries after an optimistic conflict
pub const DEFAULT_OPTIMISTIC_MAX_RETRIES: u32 = 3;
