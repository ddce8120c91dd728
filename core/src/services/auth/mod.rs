//! Authentication service module
//!
//! This module provides:
//! - Username/password login issuing access and refresh tokens
//! - Access token refresh from a refresh token
//! - Logout through refresh token revocation
//! - User registration

mod config;
mod hasher;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use hasher::{PasswordHasher, PlainTextHasher};
pub use service::AuthService;
