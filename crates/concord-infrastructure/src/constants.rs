//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Coordination defaults shared with the services are defined in
//! `concord_domain::constants`.

use std::time::Duration;

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "concord.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "concord";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CONCORD";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_ENV_FILTER: &str = "CONCORD_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum number of rotated log files to keep
pub const LOG_MAX_FILES: usize = 5;

// ============================================================================
// LOCK STORE CONSTANTS
// ============================================================================

/// Lock store provider used when none is configured
pub const DEFAULT_LOCK_PROVIDER: &str = "memory";

/// Default bound on a single lock store round trip, in milliseconds
pub const DEFAULT_LOCK_OPERATION_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// DATABASE CONSTANTS
// ============================================================================

/// Database provider used when none is configured
pub const DEFAULT_DATABASE_PROVIDER: &str = "postgres";

/// Maximum pooled database connections
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Minimum idle pooled database connections
pub const DB_MIN_IDLE: u32 = 1;

/// Maximum lifetime of a pooled connection (30 minutes)
pub const DB_CONNECTION_MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Idle time after which a pooled connection is closed (10 minutes)
pub const DB_CONNECTION_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Bound on waiting for a pooled connection
pub const DB_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
