//! Configuration for the token service

use bb_shared::JwtConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Issuer stamped on and required from every token
    pub issuer: String,
    /// Audience stamped on and required from every token
    pub audience: String,
    /// Access token lifetime, e.g. "1h"
    pub access_token_duration: String,
    /// Refresh token lifetime, e.g. "7d"
    pub refresh_token_duration: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            access_token_duration: jwt.access_token_duration.clone(),
            refresh_token_duration: jwt.refresh_token_duration.clone(),
        }
    }
}
