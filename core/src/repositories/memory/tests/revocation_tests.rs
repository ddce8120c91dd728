//! Unit tests for the revocation stores

use std::time::Duration;

use crate::repositories::memory::{InMemoryRevocationStore, NoopRevocationStore};
use crate::repositories::RevocationStore;

#[tokio::test(start_paused = true)]
async fn test_entries_expire_after_ttl() {
    let store = InMemoryRevocationStore::new();
    store.mark_revoked("jti-1", Duration::from_secs(60)).await.unwrap();

    assert!(store.is_revoked("jti-1").await.unwrap());
    assert!(!store.is_revoked("jti-2").await.unwrap());

    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(!store.is_revoked("jti-1").await.unwrap());
    assert_eq!(store.live_entries().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_live_entry_is_not_overwritten() {
    let store = InMemoryRevocationStore::new();
    store.mark_revoked("jti-1", Duration::from_secs(60)).await.unwrap();
    store.mark_revoked("jti-1", Duration::from_secs(1)).await.unwrap();

    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(store.is_revoked("jti-1").await.unwrap());
}

#[tokio::test]
async fn test_unavailable_store_fails() {
    let store = InMemoryRevocationStore::new();
    store.set_available(false);

    assert!(store.mark_revoked("jti", Duration::from_secs(1)).await.is_err());
    assert!(store.is_revoked("jti").await.is_err());

    store.set_available(true);
    assert!(!store.is_revoked("jti").await.unwrap());
}

#[tokio::test]
async fn test_noop_store_never_revokes() {
    let store = NoopRevocationStore;
    store.mark_revoked("jti", Duration::from_secs(60)).await.unwrap();
    assert!(!store.is_revoked("jti").await.unwrap());
}
