//! Transaction configuration types

use concord_domain::constants::DEFAULT_TRANSACTION_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Transaction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TransactionConfig {
    /// Bound on a whole transaction when the caller sets none, in seconds
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TRANSACTION_TIMEOUT_SECS,
        }
    }
}

impl TransactionConfig {
    /// Default transaction timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
