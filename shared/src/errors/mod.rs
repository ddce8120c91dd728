//! Shared error response structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (offending item, expected/calculated figures, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes used across the application
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_AGGREGATE: &str = "INVALID_AGGREGATE";
    pub const TOTAL_MISMATCH: &str = "TOTAL_MISMATCH";
    pub const DUPLICATE_PRODUCT: &str = "DUPLICATE_PRODUCT";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_REVOKED: &str = "TOKEN_REVOKED";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_detail() {
        let response = ErrorResponse::new(error_codes::TOTAL_MISMATCH, "Subtotal mismatch")
            .add_detail("expected", "100")
            .add_detail("item_index", 2);

        let details = response.details.unwrap();
        assert_eq!(details["expected"], serde_json::json!("100"));
        assert_eq!(details["item_index"], serde_json::json!(2));
    }

    #[test]
    fn test_details_omitted_when_empty() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "Bill not found")).unwrap();
        assert!(json.get("details").is_none());
    }
}
