//! Row lock modes

use serde::{Deserialize, Serialize};

/// Mode of a pessimistic row lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockType {
    /// Other transactions may read-lock but not write the rows
    Shared,
    /// Other transactions may neither lock nor write the rows
    Exclusive,
}
