//! Main token service implementation

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenPayload, REFRESH_TOKEN_TYPE};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationStore;

use super::config::TokenServiceConfig;
use super::duration::parse_duration;

/// Service issuing and verifying access and refresh tokens
pub struct TokenService<S: RevocationStore> {
    config: TokenServiceConfig,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Signature, expiry, issuer and audience
    validation: Validation,
    /// Signature and expiry only; issuer and audience are checked after the type
    refresh_validation: Validation,
    revocation_store: Arc<S>,
}

impl<S: RevocationStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// The service, or `InvalidArgument` if a configured lifetime is malformed
    pub fn new(config: TokenServiceConfig, revocation_store: Arc<S>) -> Result<Self, DomainError> {
        let access_ttl_seconds = parse_duration(&config.access_token_duration)?;
        let refresh_ttl_seconds = parse_duration(&config.refresh_token_duration)?;

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.leeway = 0;

        let mut refresh_validation = Validation::new(Algorithm::HS256);
        refresh_validation.validate_aud = false;
        refresh_validation.leeway = 0;

        Ok(Self {
            config,
            access_ttl_seconds,
            refresh_ttl_seconds,
            encoding_key,
            decoding_key,
            validation,
            refresh_validation,
            revocation_store,
        })
    }

    /// Lifetime of access tokens in seconds
    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    /// Signs `payload` into a token that expires after `duration`
    ///
    /// # Arguments
    ///
    /// * `payload` - Subject claims; the subject must not be empty
    /// * `duration` - Lifetime such as `"1h"`, matching `^\d+[smhd]$`
    pub fn generate(&self, payload: &TokenPayload, duration: &str) -> Result<String, DomainError> {
        Self::check_payload(payload)?;
        let ttl = parse_duration(duration)?;
        let claims = self.claims_for(payload, ttl, None, None);
        self.encode_jwt(&claims)
    }

    /// Access token with the configured access lifetime
    pub fn generate_access_token(&self, payload: &TokenPayload) -> Result<String, DomainError> {
        Self::check_payload(payload)?;
        let claims = self.claims_for(payload, self.access_ttl_seconds, None, None);
        self.encode_jwt(&claims)
    }

    /// Refresh token with a fresh `jti` and the configured refresh lifetime
    pub fn generate_refresh_token(&self, payload: &TokenPayload) -> Result<String, DomainError> {
        Self::check_payload(payload)?;
        let claims = self.claims_for(
            payload,
            self.refresh_ttl_seconds,
            Some(Uuid::new_v4().to_string()),
            Some(REFRESH_TOKEN_TYPE.to_string()),
        );
        self.encode_jwt(&claims)
    }

    /// Verifies signature, expiry, issuer and audience of a token
    ///
    /// Refresh tokens pass this check as well; only `validate_refresh_token`
    /// distinguishes token types.
    pub fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(Self::map_decode_error)
    }

    /// Verifies a refresh token
    ///
    /// Checks run in order: signature and expiry, token type, issuer and
    /// audience, revocation. An unreachable revocation store does not reject
    /// the token.
    pub async fn validate_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.refresh_validation)
            .map(|data| data.claims)
            .map_err(Self::map_decode_error)?;

        if !claims.is_refresh() {
            return Err(TokenError::InvalidTokenType {
                received: claims.token_type.clone().unwrap_or_else(|| "access".to_string()),
            }
            .into());
        }

        if claims.iss != self.config.issuer || claims.aud != self.config.audience {
            return Err(TokenError::InvalidIssuerAudience.into());
        }

        let key = Self::revocation_key(&claims, token);
        match self.revocation_store.is_revoked(&key).await {
            Ok(true) => return Err(TokenError::Revoked.into()),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Revocation store unavailable; accepting refresh token");
            }
        }

        Ok(claims)
    }

    /// Records a refresh token as revoked until it would have expired
    ///
    /// The signature must be valid; expiry is not required. Tokens that have
    /// already expired need no entry. Store failures are logged, not returned.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<(), DomainError> {
        let mut validation = self.refresh_validation.clone();
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Self::map_decode_error)?;

        if !claims.is_refresh() {
            return Err(TokenError::InvalidTokenType {
                received: claims.token_type.clone().unwrap_or_else(|| "access".to_string()),
            }
            .into());
        }

        let remaining = claims.remaining_seconds();
        if remaining == 0 {
            debug!(sub = %claims.sub, "Refresh token already expired; nothing to revoke");
            return Ok(());
        }

        let key = Self::revocation_key(&claims, token);
        if let Err(e) = self
            .revocation_store
            .mark_revoked(&key, Duration::from_secs(remaining))
            .await
        {
            warn!(error = %e, sub = %claims.sub, "Failed to record refresh token revocation");
            return Ok(());
        }

        debug!(sub = %claims.sub, ttl_secs = remaining, "Refresh token revoked");
        Ok(())
    }

    fn check_payload(payload: &TokenPayload) -> Result<(), DomainError> {
        if payload.sub.trim().is_empty() {
            return Err(TokenError::invalid_argument("payload subject is required").into());
        }
        Ok(())
    }

    fn claims_for(
        &self,
        payload: &TokenPayload,
        ttl_seconds: i64,
        jti: Option<String>,
        token_type: Option<String>,
    ) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: payload.sub.clone(),
            username: payload.username.clone(),
            email: payload.email.clone(),
            role: payload.role,
            iat: now,
            exp: now.saturating_add(ttl_seconds),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti,
            token_type,
        }
    }

    /// Encodes claims into a JWT
    fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    fn map_decode_error(e: jsonwebtoken::errors::Error) -> DomainError {
        match e.kind() {
            ErrorKind::ExpiredSignature => DomainError::Token(TokenError::Expired),
            _ => DomainError::Token(TokenError::Invalid {
                reason: e.to_string(),
            }),
        }
    }

    /// `jti` when present, otherwise a digest of the whole token
    fn revocation_key(claims: &Claims, token: &str) -> String {
        match &claims.jti {
            Some(jti) => jti.clone(),
            None => Self::hash_token(token),
        }
    }

    /// Hashes a token for use as a store key
    pub(crate) fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
