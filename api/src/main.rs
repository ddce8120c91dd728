use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::{anyhow, Context};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bb_api::{config::load_config, create_app, AppState};
use bb_core::services::{AuthService, AuthServiceConfig, BillService, TokenService, TokenServiceConfig};
use bb_infra::{
    BcryptPasswordHasher, DatabasePool, MySqlUserRepository, RedisClient, RedisRevocationStore,
    RevocationBackend,
};
use bb_shared::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config().context("failed to load configuration")?;
    init_tracing(&config.logging);
    config.validate().map_err(|e| anyhow!(e))?;

    info!(environment = %config.environment, "Starting Billbook API server");
    if config.auth.jwt.is_using_default_secret() {
        warn!("Using the default JWT secret; set BILLBOOK__AUTH__JWT__SECRET");
    }

    let pool = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to the database")?;
    pool.run_migrations()
        .await
        .context("failed to run database migrations")?;

    let revocations = Arc::new(revocation_backend(&config).await?);
    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig::from(&config.auth.jwt), revocations)
            .context("invalid token configuration")?,
    );
    let auth_service = Arc::new(AuthService::new(
        Arc::new(MySqlUserRepository::new(pool.get_pool().clone())),
        Arc::new(BcryptPasswordHasher::new(config.auth.bcrypt_cost)),
        Arc::clone(&token_service),
        AuthServiceConfig::default(),
    ));
    let bill_service = Arc::new(BillService::new(Arc::new(pool.clone())));

    let state = web::Data::new(AppState {
        bill_service,
        auth_service,
        token_service,
    });

    let bind_address = config.server.bind_address();
    info!(%bind_address, "Server will bind");

    let cors = config.cors.clone();
    let json_limit = config.server.max_payload_size;
    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, json_limit));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Installs the global subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
    }
}

/// Redis-backed revocation store, or the in-process fallback when Redis is
/// unreachable and degraded mode is allowed
async fn revocation_backend(config: &AppConfig) -> anyhow::Result<RevocationBackend> {
    match RedisClient::new(&config.cache).await {
        Ok(client) => Ok(RevocationBackend::Redis(RedisRevocationStore::new(
            client,
            config.cache.revocation_prefix.clone(),
        ))),
        Err(e) if config.cache.allow_degraded => {
            warn!(error = %e, "Redis unavailable; revocations are kept in process memory");
            Ok(RevocationBackend::local())
        }
        Err(e) => Err(anyhow::Error::new(e).context("failed to connect to Redis")),
    }
}
