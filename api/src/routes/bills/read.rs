use actix_web::{web, HttpResponse};

use bb_core::repositories::{RevocationStore, UnitOfWorkFactory, UserRepository};
use bb_core::services::PasswordHasher;

use crate::dto::BillQuery;
use crate::handlers::handle_domain_error;
use crate::middleware::AuthContext;
use crate::routes::AppState;

use super::find_accessible;

/// Handler for GET /api/v1/bills
///
/// Query parameters: `page`, `per_page`, `shop_id`, `currency_id`,
/// `payment_method_id`, `purchased_from`, `purchased_to` and, for admins,
/// `user_id`. Other callers only ever see their own bills.
pub async fn list_bills<F, U, H, S>(
    state: web::Data<AppState<F, U, H, S>>,
    auth: AuthContext,
    query: web::Query<BillQuery>,
) -> HttpResponse
where
    F: UnitOfWorkFactory + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
    S: RevocationStore + 'static,
{
    let mut filter = query.filter();
    if !auth.is_admin() {
        filter = filter.for_user(auth.user_id);
    }

    match state
        .bill_service
        .search_bills(filter, query.pagination())
        .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/bills/{id}
///
/// Returns the bill header flattened together with its live `items`.
pub async fn get_bill<F, U, H, S>(
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
    match find_accessible(&state.bill_service, &auth, path.into_inner()).await {
        Ok(bill) => HttpResponse::Ok().json(bill),
        Err(error) => handle_domain_error(error),
    }
}
