use actix_web::{web, HttpResponse};
use validator::Validate;

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::dto::{LogoutRequest, MessageResponse};
use crate::handlers::{handle_domain_error, validation_error};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the refresh token for the rest of its lifetime.
pub async fn logout<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    request: web::Json<LogoutRequest>,
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

    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(error),
    }
}
