//! Unit tests for token service

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::domain::entities::token::{Claims, TokenPayload};
use crate::domain::entities::user::UserRole;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryRevocationStore, RevocationStore};
use crate::services::token::{TokenService, TokenServiceConfig};

const SECRET: &str = "test-secret";

fn config() -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: SECRET.to_string(),
        issuer: "billbook".to_string(),
        audience: "billbook-api".to_string(),
        access_token_duration: "1h".to_string(),
        refresh_token_duration: "7d".to_string(),
    }
}

fn service() -> (Arc<InMemoryRevocationStore>, TokenService<InMemoryRevocationStore>) {
    let store = Arc::new(InMemoryRevocationStore::new());
    let service = TokenService::new(config(), store.clone()).unwrap();
    (store, service)
}

fn payload() -> TokenPayload {
    TokenPayload::new("42", "alice", "alice@example.com", UserRole::User)
}

/// Signs arbitrary claims with the test secret
fn sign(claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn refresh_claims(exp_offset: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: "42".to_string(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        role: UserRole::User,
        iat: now - 10,
        exp: now + exp_offset,
        iss: "billbook".to_string(),
        aud: "billbook-api".to_string(),
        jti: Some("fixed-jti".to_string()),
        token_type: Some("refresh".to_string()),
    }
}

#[test]
fn test_access_token_round_trip() {
    let (_, service) = service();

    let token = service.generate(&payload(), "1h").unwrap();
    let claims = service.validate(&token).unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.iss, "billbook");
    assert_eq!(claims.aud, "billbook-api");
    assert_eq!(claims.exp - claims.iat, 3600);
    assert!(claims.jti.is_none());
    assert!(claims.token_type.is_none());
}

#[test]
fn test_generate_rejects_bad_arguments() {
    let (_, service) = service();

    assert!(matches!(
        service.generate(&payload(), "1 hour"),
        Err(DomainError::Token(TokenError::InvalidArgument { .. }))
    ));

    let empty = TokenPayload::new("", "alice", "alice@example.com", UserRole::User);
    assert!(matches!(
        service.generate(&empty, "1h"),
        Err(DomainError::Token(TokenError::InvalidArgument { .. }))
    ));
}

#[test]
fn test_new_rejects_bad_configured_duration() {
    let mut bad = config();
    bad.refresh_token_duration = "1 week".to_string();
    let store = Arc::new(InMemoryRevocationStore::new());
    assert!(TokenService::new(bad, store).is_err());
}

#[test]
fn test_validate_rejects_tampered_and_foreign_tokens() {
    let (_, service) = service();
    let token = service.generate(&payload(), "1h").unwrap();

    let mut tampered = token.clone();
    tampered.push('x');
    assert!(matches!(
        service.validate(&tampered),
        Err(DomainError::Token(TokenError::Invalid { .. }))
    ));

    let other = TokenService::new(
        TokenServiceConfig {
            jwt_secret: "other-secret".to_string(),
            ..config()
        },
        Arc::new(InMemoryRevocationStore::new()),
    )
    .unwrap();
    assert!(other.validate(&token).is_err());

    let mut foreign = refresh_claims(60);
    foreign.aud = "someone-else".to_string();
    assert!(service.validate(&sign(&foreign)).is_err());
}

#[test]
fn test_validate_reports_expiry() {
    let (_, service) = service();
    let mut claims = refresh_claims(-120);
    claims.token_type = None;

    assert!(matches!(
        service.validate(&sign(&claims)),
        Err(DomainError::Token(TokenError::Expired))
    ));
}

#[test]
fn test_access_validation_accepts_refresh_tokens() {
    let (_, service) = service();
    let refresh = service.generate_refresh_token(&payload()).unwrap();
    assert!(service.validate(&refresh).is_ok());
}

#[tokio::test]
async fn test_refresh_token_round_trip() {
    let (_, service) = service();

    let token = service.generate_refresh_token(&payload()).unwrap();
    let claims = service.validate_refresh_token(&token).await.unwrap();

    assert!(claims.is_refresh());
    assert!(claims.jti.is_some());
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    assert_eq!(claims.payload(), payload());

    let second = service.generate_refresh_token(&payload()).unwrap();
    let second_claims = service.validate_refresh_token(&second).await.unwrap();
    assert_ne!(claims.jti, second_claims.jti);
}

#[tokio::test]
async fn test_refresh_validation_rejects_access_token() {
    let (_, service) = service();
    let access = service.generate(&payload(), "1h").unwrap();

    match service.validate_refresh_token(&access).await {
        Err(DomainError::Token(TokenError::InvalidTokenType { received })) => {
            assert_eq!(received, "access")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_validation_checks_issuer_and_audience() {
    let (_, service) = service();
    let mut claims = refresh_claims(600);
    claims.iss = "intruder".to_string();

    assert!(matches!(
        service.validate_refresh_token(&sign(&claims)).await,
        Err(DomainError::Token(TokenError::InvalidIssuerAudience))
    ));
}

#[tokio::test]
async fn test_refresh_validation_reports_expiry() {
    let (_, service) = service();
    assert!(matches!(
        service.validate_refresh_token(&sign(&refresh_claims(-60))).await,
        Err(DomainError::Token(TokenError::Expired))
    ));
}

#[tokio::test]
async fn test_revoked_refresh_token_is_rejected() {
    let (store, service) = service();
    let token = service.generate_refresh_token(&payload()).unwrap();

    service.revoke_refresh_token(&token).await.unwrap();

    assert!(matches!(
        service.validate_refresh_token(&token).await,
        Err(DomainError::Token(TokenError::Revoked))
    ));
    assert_eq!(store.live_entries().await, 1);
}

#[tokio::test]
async fn test_revoking_expired_token_is_noop() {
    let (store, service) = service();

    service
        .revoke_refresh_token(&sign(&refresh_claims(-60)))
        .await
        .unwrap();

    assert_eq!(store.live_entries().await, 0);
}

#[tokio::test]
async fn test_revoke_requires_refresh_token() {
    let (_, service) = service();
    let access = service.generate(&payload(), "1h").unwrap();

    assert!(matches!(
        service.revoke_refresh_token(&access).await,
        Err(DomainError::Token(TokenError::InvalidTokenType { .. }))
    ));
    assert!(service.revoke_refresh_token("not-a-token").await.is_err());
}

#[tokio::test]
async fn test_unavailable_store_degrades_gracefully() {
    let (store, service) = service();
    let token = service.generate_refresh_token(&payload()).unwrap();
    store.set_available(false);

    assert!(service.revoke_refresh_token(&token).await.is_ok());
    assert!(service.validate_refresh_token(&token).await.is_ok());
}

#[tokio::test]
async fn test_token_without_jti_is_revoked_by_digest() {
    let (store, service) = service();
    let mut claims = refresh_claims(600);
    claims.jti = None;
    let token = sign(&claims);

    service.revoke_refresh_token(&token).await.unwrap();

    let digest = TokenService::<InMemoryRevocationStore>::hash_token(&token);
    assert!(store.is_revoked(&digest).await.unwrap());
    assert!(service.validate_refresh_token(&token).await.is_err());
}
