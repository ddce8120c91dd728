//! Shared configuration and common types for the Billbook server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types for every layer
//! - The HTTP-neutral error envelope
//! - Pagination types for list endpoints

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LogFormat, LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{PaginatedResponse, Pagination};
