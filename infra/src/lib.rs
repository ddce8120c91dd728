//! # Infrastructure Layer
//!
//! Concrete adapters for the ports defined in `bb_core`:
//!
//! - **Database**: MySQL connection pool, transactional unit of work and the
//!   bill, bill item and user repositories, built on SQLx
//! - **Cache**: Redis-backed revocation store for refresh tokens
//! - **Security**: bcrypt password hasher
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis support (default)

use bb_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and the revocation store
pub mod cache;

/// Security module - password hashing
pub mod security;

pub use cache::{RedisClient, RedisRevocationStore, RevocationBackend};
pub use database::{DatabasePool, MySqlUnitOfWork, MySqlUserRepository};
pub use security::BcryptPasswordHasher;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Adapter failures surface to the use cases as internal errors
impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::internal(err.to_string())
    }
}
