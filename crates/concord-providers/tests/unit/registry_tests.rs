//! Provider registration tests
//!
//! Linking concord-providers must populate the application registry slices.

use concord_application::ports::registry::{
    DatabaseProviderConfig, LockStoreProviderConfig, list_databases, list_lock_stores,
    resolve_database, resolve_lock_store,
};

#[test]
fn test_lock_stores_registered() {
    let names: Vec<&str> = list_lock_stores().into_iter().map(|(n, _)| n).collect();
    assert!(names.contains(&"memory"));
    assert!(names.contains(&"null"));
    #[cfg(feature = "lock-redis")]
    assert!(names.contains(&"redis"));
}

#[test]
fn test_databases_registered() {
    let names: Vec<&str> = list_databases().into_iter().map(|(n, _)| n).collect();
    assert!(names.contains(&"null"));
    #[cfg(feature = "db-postgres")]
    assert!(names.contains(&"postgres"));
}

#[test]
fn test_resolve_memory_lock_store() {
    let store = resolve_lock_store(&LockStoreProviderConfig::new("memory")).unwrap();
    assert_eq!(store.provider_name(), "memory");
}

#[test]
fn test_resolve_unknown_lock_store() {
    let err = resolve_lock_store(&LockStoreProviderConfig::new("etcd")).unwrap_err();
    assert!(err.contains("Unknown lock store provider 'etcd'"));
    assert!(err.contains("memory"));
}

#[test]
fn test_resolve_null_database() {
    let factory = resolve_database(&DatabaseProviderConfig::new("null")).unwrap();
    assert_eq!(factory.provider_name(), "null");
}

#[cfg(feature = "db-postgres")]
#[test]
fn test_postgres_requires_url() {
    let err = resolve_database(&DatabaseProviderConfig::new("postgres")).unwrap_err();
    assert!(err.contains("requires a database URL"));
}
