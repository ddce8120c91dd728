use actix_web::{web, HttpResponse};

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use super::find_accessible;

/// Handler for DELETE /api/v1/bills/{id}
///
/// Soft-deletes the bill with all of its items; 204 on success.
pub async fn delete_bill<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> HttpResponse
where
    F: UnitOfWorkFactory + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    S: RevocationStore + 'static,
{
    let id = path.into_inner();
    if let Err(error) = find_accessible(&state.bill_service, &auth, id).await {
        return handle_domain_error(error);
    }

    match state.bill_service.delete_bill(id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(error),
    }
}
