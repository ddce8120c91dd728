//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{AmountField, AuthError, BillError, TokenError};

use bb_shared::{error_codes, ErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Bill(#[from] BillError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Internal failures are reduced to a generic message
impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation { .. } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string())
            }
            DomainError::NotFound { .. } => ErrorResponse::new(error_codes::NOT_FOUND, err.to_string()),
            DomainError::Unauthorized => ErrorResponse::new(error_codes::UNAUTHORIZED, err.to_string()),
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
            DomainError::Bill(e) => e.into(),
            DomainError::Auth(e) => e.into(),
            DomainError::Token(TokenError::GenerationFailed) => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
            DomainError::Token(e) => e.into(),
        }
    }
}
