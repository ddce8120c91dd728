//! Unit tests for domain error types

use bb_shared::ErrorResponse;
use rust_decimal_macros::dec;

use crate::errors::{AmountField, AuthError, BillError, DomainError, TokenError};

#[test]
fn test_total_mismatch_message_uses_normalized_figures() {
    let error = BillError::total_mismatch(AmountField::Subtotal, dec!(100.00), dec!(150.50));
    assert_eq!(
        error.to_string(),
        "subtotal mismatch: expected 100, calculated 150.5"
    );
}

#[test]
fn test_invalid_item_carries_index() {
    let error = BillError::invalid_item(2, "content value must be absent for unit items");
    let message = error.to_string();
    assert!(message.contains("item 2"));

    let response = ErrorResponse::from(&error);
    assert_eq!(response.error, "INVALID_AGGREGATE");
    assert_eq!(response.details.unwrap()["item_index"], 2);
}

#[test]
fn test_total_mismatch_response_details() {
    let error = DomainError::from(BillError::total_mismatch(
        AmountField::Total,
        dec!(90),
        dec!(100),
    ));
    let response = ErrorResponse::from(&error);
    let details = response.details.unwrap();

    assert_eq!(response.error, "TOTAL_MISMATCH");
    assert_eq!(details["field"], "total");
    assert_eq!(details["expected"], "90");
    assert_eq!(details["calculated"], "100");
}

#[test]
fn test_credentials_message_is_generic() {
    assert_eq!(
        AuthError::InvalidCredentials.to_string(),
        "Invalid username or password"
    );
    let wrapped = DomainError::from(AuthError::InvalidCredentials);
    assert_eq!(wrapped.to_string(), "Invalid username or password");
}

#[test]
fn test_token_type_message_names_received_type() {
    let error = TokenError::InvalidTokenType {
        received: "access".to_string(),
    };
    assert!(error.to_string().contains("received access token"));
    assert_eq!(error.error_code(), "TOKEN_INVALID");
}

#[test]
fn test_internal_message_not_exposed() {
    let error = DomainError::internal("connection refused by 10.0.0.4");
    let response = ErrorResponse::from(&error);
    assert_eq!(response.error, "INTERNAL_ERROR");
    assert!(!response.message.contains("10.0.0.4"));
}
