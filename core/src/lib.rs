//! # Billbook Core
//!
//! Core business logic and domain layer for the Billbook backend.
//! This crate contains domain entities, use-case services, repository and port
//! interfaces, and the error taxonomy that the infrastructure and presentation
//! layers build on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
