//! Redis cache client implementation
//!
//! A multiplexed async connection opened with exponential-backoff retry, and
//! the handful of commands the revocation store needs.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use bb_shared::CacheConfig;

use crate::InfrastructureError;

/// Upper bound of the delay between connection attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis client over one multiplexed connection
///
/// Cloning is cheap; clones share the connection.
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
}

impl RedisClient {
    /// Connect using the retry settings of `config`
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::connect_with_retry(client, config.max_retries.max(1), config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");
        Ok(Self { connection })
    }

    async fn connect_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        attempt = attempts,
                        max_retries,
                        delay_ms = delay,
                        error = %e,
                        "Failed to connect to Redis, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Giving up connecting to Redis");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// `SET key value EX ttl NX`
    ///
    /// # Returns
    /// * `Ok(true)` - The key was written
    /// * `Ok(false)` - The key already existed and was left untouched
    pub async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(expiry_seconds)
            .arg("NX")
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    /// Whether `key` exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// Time to live of `key` in seconds; `None` when the key is missing or has
    /// no expiry
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let ttl: i64 = conn.ttl(key).await?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// Check connectivity with `PING`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

/// Hide credentials embedded in a Redis URL
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
