//! In-memory and no-op revocation stores.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::warn;

use crate::errors::DomainError;
use crate::repositories::revocation::RevocationStore;

/// Revocation store kept in process memory
///
/// Entries expire on their own; a live entry is never overwritten.
#[derive(Debug, Clone)]
pub struct InMemoryRevocationStore {
    entries: Arc<RwLock<HashMap<String, Instant>>>,
    available: Arc<AtomicBool>,
}

impl Default for InMemoryRevocationStore {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails while unavailable
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of entries that have not expired yet
    pub async fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries.read().await.values().filter(|exp| **exp > now).count()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::internal("revocation store unavailable"))
        }
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn mark_revoked(&self, key: &str, ttl: Duration) -> Result<(), DomainError> {
        self.check_available()?;

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, exp| *exp > now);
        entries.entry(key.to_string()).or_insert(now + ttl);
        Ok(())
    }

    async fn is_revoked(&self, key: &str) -> Result<bool, DomainError> {
        self.check_available()?;

        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .map(|exp| *exp > Instant::now())
            .unwrap_or(false))
    }
}

/// Store that records nothing; every token reads as not revoked
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRevocationStore;

#[async_trait]
impl RevocationStore for NoopRevocationStore {
    async fn mark_revoked(&self, key: &str, ttl: Duration) -> Result<(), DomainError> {
        warn!(
            key = key,
            ttl_secs = ttl.as_secs(),
            "No revocation store configured; refresh token stays valid until expiry"
        );
        Ok(())
    }

    async fn is_revoked(&self, _key: &str) -> Result<bool, DomainError> {
        Ok(false)
    }
}
