//! Refresh-token revocation stores backed by Redis.

use std::time::Duration;

use async_trait::async_trait;
use bb_core::errors::DomainError;
use bb_core::repositories::{InMemoryRevocationStore, RevocationStore};
use tracing::{debug, warn};

use super::redis_client::RedisClient;

/// Revocation store writing `SET <prefix><key> 1 EX <ttl> NX` and reading with
/// `EXISTS`
///
/// Entries are never rewritten: a second revocation of a live key leaves the
/// first entry and its expiry in place.
#[derive(Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
    prefix: String,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    pub(crate) fn key_for(prefix: &str, key: &str) -> String {
        format!("{}{}", prefix, key)
    }

    /// Redis rejects `EX 0`; sub-second lifetimes are rounded up
    pub(crate) fn expiry_seconds(ttl: Duration) -> u64 {
        ttl.as_secs().max(1)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn mark_revoked(&self, key: &str, ttl: Duration) -> Result<(), DomainError> {
        let redis_key = Self::key_for(&self.prefix, key);
        let written = self
            .client
            .set_if_absent_with_expiry(&redis_key, "1", Self::expiry_seconds(ttl))
            .await?;
        debug!(key = %redis_key, written, "Revocation recorded");
        Ok(())
    }

    async fn is_revoked(&self, key: &str) -> Result<bool, DomainError> {
        let redis_key = Self::key_for(&self.prefix, key);
        Ok(self.client.exists(&redis_key).await?)
    }
}

/// Revocation store chosen at startup
///
/// `Local` keeps revocations in process memory; it is the fallback when Redis
/// is unreachable and degraded operation is allowed.
#[derive(Clone)]
pub enum RevocationBackend {
    Redis(RedisRevocationStore),
    Local(std::sync::Arc<InMemoryRevocationStore>),
}

impl RevocationBackend {
    pub fn local() -> Self {
        warn!("Using in-process revocation store; revocations are not shared between instances");
        RevocationBackend::Local(std::sync::Arc::new(InMemoryRevocationStore::new()))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RevocationBackend::Local(_))
    }
}

#[async_trait]
impl RevocationStore for RevocationBackend {
    async fn mark_revoked(&self, key: &str, ttl: Duration) -> Result<(), DomainError> {
        match self {
            RevocationBackend::Redis(store) => store.mark_revoked(key, ttl).await,
            RevocationBackend::Local(store) => store.mark_revoked(key, ttl).await,
        }
    }

    async fn is_revoked(&self, key: &str) -> Result<bool, DomainError> {
        match self {
            RevocationBackend::Redis(store) => store.is_revoked(key).await,
            RevocationBackend::Local(store) => store.is_revoked(key).await,
        }
    }
}
