//! Revocation store for refresh tokens.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::DomainError;

/// Shared blocklist of revoked refresh tokens
///
/// Entries are keyed by the token's `jti` (or a digest of the token when it has
/// none) and are append/expire only: an entry is never modified after it is
/// written, it simply disappears once its TTL elapses.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `key` as revoked for `ttl`
    async fn mark_revoked(&self, key: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Whether `key` is currently revoked
    async fn is_revoked(&self, key: &str) -> Result<bool, DomainError>;
}
