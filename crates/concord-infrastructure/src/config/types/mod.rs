//! Configuration types module

pub mod app;
pub mod database;
pub mod lock;
pub mod logging;
pub mod transaction;

// Re-export main types
pub use app::AppConfig;
pub use database::DatabaseConfig;
pub use lock::LockConfig;
pub use logging::LoggingConfig;
pub use transaction::TransactionConfig;
