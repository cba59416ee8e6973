//! In-memory lease store tests

use concord_domain::ports::LockStore;
use concord_providers::InMemoryLockStore;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_set_if_absent_refuses_live_key() {
    let store = InMemoryLockStore::new();

    assert!(store.set_if_absent("lock:a", "t1", TTL).await.unwrap());
    assert!(!store.set_if_absent("lock:a", "t2", TTL).await.unwrap());
    assert_eq!(store.get("lock:a").await.unwrap().as_deref(), Some("t1"));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_compare_and_delete_requires_token() {
    let store = InMemoryLockStore::new();
    store.set_if_absent("lock:a", "t1", TTL).await.unwrap();

    assert!(!store.compare_and_delete("lock:a", "t2").await.unwrap());
    assert_eq!(store.get("lock:a").await.unwrap().as_deref(), Some("t1"));

    assert!(store.compare_and_delete("lock:a", "t1").await.unwrap());
    assert!(store.get("lock:a").await.unwrap().is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_compare_and_delete_missing_key() {
    let store = InMemoryLockStore::new();
    assert!(!store.compare_and_delete("lock:none", "t1").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_expired_record_is_free() {
    let store = InMemoryLockStore::new();
    store
        .set_if_absent("lock:a", "t1", Duration::from_secs(1))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_millis(1001)).await;

    assert!(store.get("lock:a").await.unwrap().is_none());
    assert!(store.remaining_ttl("lock:a").await.unwrap().is_none());
    assert!(!store.compare_and_delete("lock:a", "t1").await.unwrap());
    assert!(store.set_if_absent("lock:a", "t2", TTL).await.unwrap());
    assert_eq!(store.get("lock:a").await.unwrap().as_deref(), Some("t2"));
}

#[tokio::test(start_paused = true)]
async fn test_compare_and_expire_resets_ttl_for_owner_only() {
    let store = InMemoryLockStore::new();
    store
        .set_if_absent("lock:a", "t1", Duration::from_secs(2))
        .await
        .unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;

    assert!(
        !store
            .compare_and_expire("lock:a", "t2", Duration::from_secs(10))
            .await
            .unwrap()
    );
    assert_eq!(
        store.remaining_ttl("lock:a").await.unwrap(),
        Some(Duration::from_secs(1))
    );

    assert!(
        store
            .compare_and_expire("lock:a", "t1", Duration::from_secs(10))
            .await
            .unwrap()
    );
    assert_eq!(
        store.remaining_ttl("lock:a").await.unwrap(),
        Some(Duration::from_secs(10))
    );
}

#[tokio::test(start_paused = true)]
async fn test_purge_expired() {
    let store = InMemoryLockStore::new();
    store
        .set_if_absent("lock:short", "t1", Duration::from_secs(1))
        .await
        .unwrap();
    store.set_if_absent("lock:long", "t2", TTL).await.unwrap();

    tokio::time::advance(Duration::from_secs(2)).await;
    store.purge_expired();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("lock:long").await.unwrap().as_deref(), Some("t2"));
}

#[tokio::test]
async fn test_clones_share_records() {
    let store = InMemoryLockStore::new();
    let other = store.clone();

    store.set_if_absent("lock:a", "t1", TTL).await.unwrap();
    assert!(!other.set_if_absent("lock:a", "t2", TTL).await.unwrap());
    assert_eq!(store.provider_name(), "memory");
}
