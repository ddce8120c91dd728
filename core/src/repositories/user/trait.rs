//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Soft-deleted users are never returned.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this username
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user with its assigned identity
    /// * `Err(DomainError)` - Creation failed (e.g., duplicate username)
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Check if a username is already registered
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;
}
