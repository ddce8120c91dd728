//! Database connection pool management
//!
//! Wraps the SQLx MySQL pool. The pool is also the unit-of-work factory of the
//! bill workflows: every call to `create` hands out a unit that opens its own
//! transaction on `begin_transaction`.

use std::str::FromStr;
use std::time::Duration;

use bb_core::repositories::UnitOfWorkFactory;
use bb_shared::DatabaseConfig;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    MySqlPool, Row,
};
use tracing::{debug, error, info, warn};

use super::unit_of_work::MySqlUnitOfWork;
use crate::InfrastructureError;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    /// SQLx MySQL connection pool
    pool: MySqlPool,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `config` - Database configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Database pool or error
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        info!(
            max_connections = config.max_connections,
            "Creating database connection pool"
        );

        let connect_options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create database pool");
                InfrastructureError::Database(e)
            })?;

        info!("Database connection pool created successfully");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying SQLx pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing database health check");

        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        let value: i64 = row.try_get(0)?;
        if value == 1 {
            Ok(true)
        } else {
            warn!(value, "Database health check returned unexpected value");
            Ok(false)
        }
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Apply the SQL migrations shipped with this crate
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InfrastructureError::Database(e.into()))?;
        info!("Database migrations completed");
        Ok(())
    }
}

impl UnitOfWorkFactory for DatabasePool {
    type UnitOfWork = MySqlUnitOfWork;

    fn create(&self) -> MySqlUnitOfWork {
        MySqlUnitOfWork::new(self.pool.clone())
    }
}
