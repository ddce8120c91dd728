//! Authentication and token configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens (HS256)
    pub secret: String,

    /// Access token lifetime, e.g. "1h"
    #[serde(default = "default_access_token_duration")]
    pub access_token_duration: String,

    /// Refresh token lifetime, e.g. "7d"
    #[serde(default = "default_refresh_token_duration")]
    pub refresh_token_duration: String,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// JWT audience claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            access_token_duration: default_access_token_duration(),
            refresh_token_duration: default_refresh_token_duration(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// bcrypt work factor for password hashing
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_access_token_duration() -> String {
    String::from("1h")
}

fn default_refresh_token_duration() -> String {
    String::from("7d")
}

fn default_issuer() -> String {
    String::from("billbook")
}

fn default_audience() -> String {
    String::from("billbook-api")
}

fn default_bcrypt_cost() -> u32 {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_duration, "1h");
        assert_eq!(config.refresh_token_duration, "7d");
        assert_eq!(config.issuer, "billbook");
        assert_eq!(config.audience, "billbook-api");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_with_secret() {
        let config = JwtConfig::new("my-secret");
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_auth_config_defaults_when_missing() {
        let config: AuthConfig = serde_json::from_str(r#"{ "jwt": { "secret": "s" } }"#).unwrap();
        assert_eq!(config.jwt.secret, "s");
        assert_eq!(config.jwt.access_token_duration, "1h");
        assert_eq!(config.bcrypt_cost, 12);
    }
}
