//! Application factory
//!
//! Builds the actix-web application from the shared state: CORS, request
//! tracing, the health check and the versioned API routes.

use std::sync::Arc;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;
use bb_shared::{error_codes, CorsConfig, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::{create_cors, AccessTokenVerifier, JwtAuth};
use crate::routes::{auth, bills, health_check, AppState};

/// Create and configure the application with all dependencies
///
/// The token service in `app_state` also verifies the bearer tokens of the
/// bill routes.
pub fn create_app<F, U, H, S>(
    app_state: web::Data<AppState<F, U, H, S>>,
    cors: &CorsConfig,
    json_limit: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    F: UnitOfWorkFactory + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    S: RevocationStore + 'static,
{
    let verifier: Arc<dyn AccessTokenVerifier> = app_state.token_service.clone();

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().limit(json_limit))
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register::<F, U, H, S>))
                        .route("/login", web::post().to(auth::login::<F, U, H, S>))
                        .route("/refresh", web::post().to(auth::refresh::<F, U, H, S>))
                        .route("/logout", web::post().to(auth::logout::<F, U, H, S>)),
                )
                .service(
                    web::scope("/bills")
                        .wrap(JwtAuth::new(verifier))
                        .route("", web::post().to(bills::create_bill::<F, U, H, S>))
                        .route("", web::get().to(bills::list_bills::<F, U, H, S>))
                        .route("/{id}", web::get().to(bills::get_bill::<F, U, H, S>))
                        .route("/{id}", web::patch().to(bills::update_bill::<F, U, H, S>))
                        .route("/{id}", web::delete().to(bills::delete_bill::<F, U, H, S>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Fallback for unknown routes
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
