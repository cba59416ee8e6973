//! Per-transaction options

use super::IsolationLevel;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options applied when a transaction begins
///
/// # Example
///
/// ```rust
/// use concord_domain::value_objects::{IsolationLevel, TransactionOptions};
/// use std::time::Duration;
///
/// let options = TransactionOptions::new()
///     .with_isolation_level(IsolationLevel::Serializable)
///     .with_timeout(Duration::from_secs(5));
/// assert!(!options.read_only);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOptions {
    /// Isolation level; `None` keeps the engine default
    pub isolation_level: Option<IsolationLevel>,
    /// Read-only hint passed to the engine at begin
    pub read_only: bool,
    /// Bound on the whole transaction; `None` uses the manager default
    pub timeout: Option<Duration>,
}

impl TransactionOptions {
    /// Engine defaults, read-write, manager timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only options
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Set the isolation level
    pub fn with_isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = Some(level);
        self
    }

    /// Set the read-only hint
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
