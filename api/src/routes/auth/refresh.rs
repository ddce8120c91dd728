use actix_web::{web, HttpResponse};
use validator::Validate;

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::dto::{RefreshTokenRequest, TokenResponse};
use crate::handlers::{handle_domain_error, validation_error};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Issues a new access token and refresh token. The presented refresh token
/// stays valid until it expires or is logged out.
///
/// ## Errors
/// - 401 Unauthorized: expired refresh token
/// - 403 Forbidden: invalid or revoked refresh token
pub async fn refresh<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    request: web::Json<RefreshTokenRequest>,
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

    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(result) => HttpResponse::Ok().json(TokenResponse::from(result)),
        Err(error) => handle_domain_error(error),
    }
}
