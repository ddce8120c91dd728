//! Cache module for Redis-backed state
//!
//! Holds the Redis client with connection retry and the refresh-token
//! revocation store built on it.

pub mod redis_client;
pub mod revocation_store;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use revocation_store::{RedisRevocationStore, RevocationBackend};

// Re-export commonly used types
pub use bb_shared::CacheConfig;
