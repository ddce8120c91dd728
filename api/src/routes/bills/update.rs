use actix_web::{web, HttpResponse};

use bb_core::domain::entities::BillPatch;
use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use super::{check_owner_assignment, find_accessible};

/// Handler for PATCH /api/v1/bills/{id}
///
/// Absent fields are left untouched. Items are upserted by product; when at
/// least one item carries its `id`, live items not mentioned are removed.
/// Totals are not re-checked on update.
///
/// # Response
///
/// - 200 OK: the applied patch, items stamped with the bill id
/// - 404 Not Found: no such bill for this caller
pub async fn update_bill<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    auth: AuthContext,
    path: web::Path<i64>,
    patch: web::Json<BillPatch>,
) -> HttpResponse
where
    F: UnitOfWorkFactory + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    S: RevocationStore + 'static,
{
    let id = path.into_inner();
    let patch = patch.into_inner();

    if let Err(error) = check_owner_assignment(&auth, patch.user_id) {
        return handle_domain_error(error);
    }
    if let Err(error) = find_accessible(&state.bill_service, &auth, id).await {
        return handle_domain_error(error);
    }

    match state.bill_service.update_bill(id, patch).await {
        Ok(applied) => HttpResponse::Ok().json(applied),
        Err(error) => handle_domain_error(error),
    }
}
