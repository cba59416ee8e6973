//! Error handling types

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Concord
#[derive(Error, Debug)]
pub enum Error {
    /// The shared lock store could not be reached or rejected a command
    #[error("Lock store unavailable: {message}")]
    LockStoreUnavailable {
        /// Description of the store failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A blocking acquire was cancelled or ran past its deadline
    #[error("Timed out acquiring lock '{key}'")]
    LockAcquisitionTimeout {
        /// Caller-facing lock key
        key: String,
    },

    /// The lock record is absent or holds another owner's token
    #[error("Lock '{key}' is not owned by this instance")]
    LockNotOwned {
        /// Caller-facing lock key
        key: String,
    },

    /// A table or column name failed identifier validation
    #[error("Invalid SQL identifier: '{identifier}'")]
    InvalidIdentifier {
        /// The rejected identifier
        identifier: String,
    },

    /// A version-gated write matched no row
    #[error("Optimistic lock conflict on '{table}': expected version {expected_version}")]
    OptimisticConflict {
        /// Table the write targeted
        table: String,
        /// Version the caller read before writing
        expected_version: i64,
    },

    /// Begin, commit or deadline failure of a transaction
    #[error("Transaction failure: {message}")]
    TransactionFailure {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database statement error
    #[error("Database error: {message}")]
    Database {
        /// Description of the database error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Lease lock error creation methods
impl Error {
    /// Create a lock store error
    pub fn lock_store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::LockStoreUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lock store error with source
    pub fn lock_store_unavailable_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::LockStoreUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an acquisition timeout error
    pub fn lock_acquisition_timeout<S: Into<String>>(key: S) -> Self {
        Self::LockAcquisitionTimeout { key: key.into() }
    }

    /// Create a not-owned error
    pub fn lock_not_owned<S: Into<String>>(key: S) -> Self {
        Self::LockNotOwned { key: key.into() }
    }
}

// Database locking error creation methods
impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier<S: Into<String>>(identifier: S) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Create an optimistic conflict error
    pub fn optimistic_conflict<S: Into<String>>(table: S, expected_version: i64) -> Self {
        Self::OptimisticConflict {
            table: table.into(),
            expected_version,
        }
    }

    /// Create a transaction failure
    pub fn transaction_failure<S: Into<String>>(message: S) -> Self {
        Self::TransactionFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transaction failure with source
    pub fn transaction_failure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::TransactionFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a transaction failure for an exceeded deadline
    pub fn transaction_timeout(timeout: Duration) -> Self {
        Self::TransactionFailure {
            message: format!("transaction exceeded timeout of {timeout:?}"),
            source: None,
        }
    }

    /// Create a database error
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a database error with source
    pub fn database_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Basic error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification
impl Error {
    /// Whether retrying the whole read-modify-write cycle can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::OptimisticConflict { .. }
                | Self::LockAcquisitionTimeout { .. }
                | Self::LockStoreUnavailable { .. }
        )
    }

    /// Whether this is an optimistic version conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::OptimisticConflict { .. })
    }
}
