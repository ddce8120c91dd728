use actix_web::{web, HttpResponse};
use validator::Validate;

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::dto::{LoginRequest, LoginResponse};
use crate::handlers::{handle_domain_error, validation_error};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "secret-pass" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "user": { "id": 1, "username": "alice", ... },
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "expires_in": 3600,
///     "token_type": "Bearer"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: unknown username or wrong password, same body for both
pub async fn login<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    F: UnitOfWorkFactory + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    S: RevocationStore + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_domain_error(validation_error(errors));
    }

    match state
        .auth_service
        .login(&request.username, &request.password)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(LoginResponse::from(result)),
        Err(error) => handle_domain_error(error),
    }
}
