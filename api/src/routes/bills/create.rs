use actix_web::{web, HttpResponse};
use validator::Validate;

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::dto::CreateBillRequest;
use crate::handlers::{handle_domain_error, validation_error};
use crate::middleware::AuthContext;
use crate::routes::AppState;

use super::check_owner_assignment;

/// Handler for POST /api/v1/bills
///
/// The bill and its items are written in one transaction. `user_id` defaults
/// to the caller and `created_by` is always the caller.
///
/// # Response
///
/// - 201 Created: the stored bill header
/// - 400 Bad Request: `INVALID_AGGREGATE`, `TOTAL_MISMATCH` (with `field`,
///   `expected` and `calculated` details) or `DUPLICATE_PRODUCT`
pub async fn create_bill<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    auth: AuthContext,
    request: web::Json<CreateBillRequest>,
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
    if let Err(error) = check_owner_assignment(&auth, request.user_id) {
        return handle_domain_error(error);
    }

    let owner = request.user_id.unwrap_or(auth.user_id);
    let input = request.into_input(owner, auth.user_id);

    match state.bill_service.create_bill(input).await {
        Ok(bill) => HttpResponse::Created().json(bill),
        Err(error) => handle_domain_error(error),
    }
}
