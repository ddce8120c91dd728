//! Error types for the bill aggregate, authentication and token management.

use std::fmt;

use bb_shared::{error_codes, ErrorResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount of a bill whose declared value can disagree with the computed one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountField {
    Subtotal,
    Total,
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountField::Subtotal => f.write_str("subtotal"),
            AmountField::Total => f.write_str("total"),
        }
    }
}

/// Business-rule violations of a bill and its items
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillError {
    #[error("Invalid bill: {reason}")]
    InvalidAggregate { reason: String },

    /// `index` is 1-based
    #[error("Invalid bill: item {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("{field} mismatch: expected {expected}, calculated {calculated}")]
    TotalMismatch {
        field: AmountField,
        expected: Decimal,
        calculated: Decimal,
    },

    #[error("Duplicate product in bill items: {product_id}")]
    DuplicateProduct { product_id: i64 },
}

impl BillError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        BillError::InvalidAggregate { reason: reason.into() }
    }

    pub fn invalid_item(index: usize, reason: impl Into<String>) -> Self {
        BillError::InvalidItem {
            index,
            reason: reason.into(),
        }
    }

    /// Figures are normalized so `100.00` reads as `100`
    pub fn total_mismatch(field: AmountField, expected: Decimal, calculated: Decimal) -> Self {
        BillError::TotalMismatch {
            field,
            expected: expected.normalize(),
            calculated: calculated.normalize(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BillError::InvalidAggregate { .. } | BillError::InvalidItem { .. } => {
                error_codes::INVALID_AGGREGATE
            }
            BillError::TotalMismatch { .. } => error_codes::TOTAL_MISMATCH,
            BillError::DuplicateProduct { .. } => error_codes::DUPLICATE_PRODUCT,
        }
    }
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Shared by unknown usernames and wrong passwords
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token subject is missing")]
    MissingSubject,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    RefreshTokenInvalid,

    #[error("Refresh token revoked")]
    RefreshTokenRevoked,

    #[error("Username already taken")]
    UsernameTaken,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials | AuthError::MissingSubject => error_codes::UNAUTHORIZED,
            AuthError::RefreshTokenExpired => error_codes::TOKEN_EXPIRED,
            AuthError::RefreshTokenInvalid => error_codes::TOKEN_INVALID,
            AuthError::RefreshTokenRevoked => error_codes::TOKEN_REVOKED,
            AuthError::UsernameTaken => error_codes::CONFLICT,
        }
    }
}

/// Token issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {reason}")]
    Invalid { reason: String },

    #[error("Invalid token type: expected refresh token, received {received} token")]
    InvalidTokenType { received: String },

    #[error("Invalid token issuer or audience")]
    InvalidIssuerAudience,

    #[error("Token revoked")]
    Revoked,

    #[error("Token generation failed")]
    GenerationFailed,
}

impl TokenError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        TokenError::InvalidArgument { message: message.into() }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidArgument { .. } => error_codes::BAD_REQUEST,
            TokenError::Expired => error_codes::TOKEN_EXPIRED,
            TokenError::Invalid { .. }
            | TokenError::InvalidTokenType { .. }
            | TokenError::InvalidIssuerAudience => error_codes::TOKEN_INVALID,
            TokenError::Revoked => error_codes::TOKEN_REVOKED,
            TokenError::GenerationFailed => error_codes::INTERNAL_ERROR,
        }
    }
}

/// Convert BillError to ErrorResponse, carrying the diagnostic figures
impl From<&BillError> for ErrorResponse {
    fn from(err: &BillError) -> Self {
        let response = ErrorResponse::new(err.error_code(), err.to_string());
        match err {
            BillError::InvalidItem { index, .. } => response.add_detail("item_index", index),
            BillError::TotalMismatch {
                field,
                expected,
                calculated,
            } => response
                .add_detail("field", field)
                .add_detail("expected", expected.to_string())
                .add_detail("calculated", calculated.to_string()),
            BillError::DuplicateProduct { product_id } => {
                response.add_detail("product_id", product_id)
            }
            BillError::InvalidAggregate { .. } => response,
        }
    }
}

/// Convert AuthError to ErrorResponse
impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}

/// Convert TokenError to ErrorResponse
impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}
