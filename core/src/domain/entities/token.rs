//! Token entities for JWT-based authentication.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::user::{User, UserRole};

/// Value of the `type` claim carried by refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Subject claims embedded in every token issued for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl TokenPayload {
    pub fn new(sub: impl Into<String>, username: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            email: email.into(),
            role,
        }
    }
}

impl From<&User> for TokenPayload {
    fn from(user: &User) -> Self {
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    pub username: String,

    pub email: String,

    pub role: UserRole,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, only present on refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Token type marker, `"refresh"` on refresh tokens
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Claims {
    /// Whether this token carries the refresh marker
    pub fn is_refresh(&self) -> bool {
        self.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Seconds until expiry, zero once expired
    pub fn remaining_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        remaining.max(0) as u64
    }

    /// Subject claims of this token
    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            sub: self.sub.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
