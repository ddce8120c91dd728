//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - Access token generation and verification
//! - Refresh token issuance and validation
//! - Refresh token revocation through a pluggable store

mod config;
mod duration;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use duration::parse_duration;
pub use service::TokenService;
