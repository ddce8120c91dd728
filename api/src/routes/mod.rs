//! Route handlers and the state they share

pub mod auth;
pub mod bills;

use std::sync::Arc;

use actix_web::HttpResponse;
use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::{AuthService, BillService, PasswordHasher, TokenService};

/// Application state containing all services
pub struct AppState<F, U, H, S>
where
    F: UnitOfWorkFactory,
    U: UserRepository,
    H: PasswordHasher,
    S: RevocationStore,
{
    pub bill_service: Arc<BillService<F>>,
    pub auth_service: Arc<AuthService<U, H, S>>,
    pub token_service: Arc<TokenService<S>>,
}

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "billbook-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
