//! Password hashing port.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Password hashing and verification
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a digest of `plaintext`
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Whether `plaintext` matches `digest`
    async fn compare(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError>;
}

/// Hasher that stores passwords verbatim with a marker prefix
///
/// Only for tests and local fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

const PLAIN_PREFIX: &str = "plain:";

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        Ok(format!("{}{}", PLAIN_PREFIX, plaintext))
    }

    async fn compare(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError> {
        Ok(digest
            .strip_prefix(PLAIN_PREFIX)
            .map(|stored| stored == plaintext)
            .unwrap_or(false))
    }
}
