//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration, used by the refresh-token revocation store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Key prefix for revoked refresh tokens
    #[serde(default = "default_revocation_prefix")]
    pub revocation_prefix: String,

    /// Connection attempts before giving up at startup
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between connection attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Fall back to the in-process store when Redis is unreachable at startup
    #[serde(default = "default_allow_degraded")]
    pub allow_degraded: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            revocation_prefix: default_revocation_prefix(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            allow_degraded: default_allow_degraded(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

fn default_revocation_prefix() -> String {
    String::from("revoked:refresh:")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_allow_degraded() -> bool {
    true
}
