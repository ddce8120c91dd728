//! bcrypt implementation of the password hasher port.

use async_trait::async_trait;
use bb_core::errors::DomainError;
use bb_core::services::PasswordHasher;
use tracing::error;

/// Password hasher using bcrypt
///
/// Hashing is CPU-bound, so it runs on the blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// # Arguments
    /// * `cost` - bcrypt work factor, between 4 and 31
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                DomainError::internal("Password hashing failed")
            })
    }

    async fn compare(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError> {
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();

        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest))
            .await
            .map_err(|e| DomainError::internal(format!("Password check task failed: {}", e)))?;

        // a malformed stored digest reads as a mismatch
        Ok(verified.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_compare() {
        let hasher = BcryptPasswordHasher::new(4);

        let digest = hasher.hash("correct horse").await.unwrap();
        assert!(digest.starts_with("$2"));
        assert!(hasher.compare("correct horse", &digest).await.unwrap());
        assert!(!hasher.compare("battery staple", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_digest_is_a_mismatch() {
        let hasher = BcryptPasswordHasher::new(4);
        assert!(!hasher.compare("anything", "not-a-bcrypt-hash").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_cost_is_an_error() {
        let hasher = BcryptPasswordHasher::new(2);
        assert!(hasher.hash("password").await.is_err());
    }
}
