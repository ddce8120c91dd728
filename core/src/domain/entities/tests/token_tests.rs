//! Tests for token claims

use chrono::Utc;

use crate::domain::entities::token::{Claims, TokenPayload};
use crate::domain::entities::user::UserRole;

fn claims(token_type: Option<&str>, exp_offset: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: "42".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        role: UserRole::User,
        iat: now,
        exp: now + exp_offset,
        iss: "billbook".to_string(),
        aud: "billbook-api".to_string(),
        jti: token_type.map(|_| "jti-1".to_string()),
        token_type: token_type.map(str::to_string),
    }
}

#[test]
fn test_refresh_marker() {
    assert!(claims(Some("refresh"), 60).is_refresh());
    assert!(!claims(None, 60).is_refresh());
    assert!(!claims(Some("access"), 60).is_refresh());
}

#[test]
fn test_type_claim_is_renamed() {
    let value = serde_json::to_value(claims(Some("refresh"), 60)).unwrap();
    assert_eq!(value["type"], "refresh");
    assert!(value.get("token_type").is_none());

    let access = serde_json::to_value(claims(None, 60)).unwrap();
    assert!(access.get("type").is_none());
    assert!(access.get("jti").is_none());
}

#[test]
fn test_expiry_helpers() {
    let live = claims(None, 120);
    assert!(!live.is_expired());
    assert!(live.remaining_seconds() > 100);

    let expired = claims(None, -5);
    assert!(expired.is_expired());
    assert_eq!(expired.remaining_seconds(), 0);
}

#[test]
fn test_payload_round_trip() {
    let c = claims(None, 60);
    let payload = c.payload();
    assert_eq!(payload, TokenPayload::new("42", "alice", "alice@example.com", UserRole::User));
}
