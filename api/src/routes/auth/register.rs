use actix_web::{web, HttpResponse};
use validator::Validate;

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::dto::RegisterRequest;
use crate::handlers::{handle_domain_error, validation_error};
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/register
///
/// # Response
///
/// - 201 Created: the new account, without credentials
/// - 400 Bad Request: malformed body or a password that is too short
/// - 409 Conflict: the username is taken
pub async fn register<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    F: UnitOfWorkFactory + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    S: RevocationStore + 'static,
{
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return handle_domain_error(validation_error(errors));
    }

    match state.auth_service.register(request.into()).await {
        Ok(user) => HttpResponse::Created().json(user),
        Err(error) => handle_domain_error(error),
    }
}
