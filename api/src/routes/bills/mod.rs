//! Bill route handlers
//!
//! Every handler runs behind the JWT middleware. Callers see and change
//! their own bills; admins see and change all of them.

pub mod create;
pub mod delete;
pub mod read;
pub mod update;

pub use create::create_bill;
pub use delete::delete_bill;
pub use read::{get_bill, list_bills};
pub use update::update_bill;

use bb_core::domain::entities::BillWithItems;
use bb_core::errors::{DomainError, DomainResult};
use bb_core::repositories::UnitOfWorkFactory;
use bb_core::services::BillService;

use crate::middleware::AuthContext;

/// Loads a bill the caller may access
///
/// Bills owned by someone else are reported as missing.
pub(crate) async fn find_accessible<F: UnitOfWorkFactory>(
    service: &BillService<F>,
    auth: &AuthContext,
    id: i64,
) -> DomainResult<BillWithItems> {
    let bill = service.get_bill(id).await?;
    if !auth.can_access(bill.bill.user_id) {
        return Err(DomainError::not_found(format!("Bill {}", id)));
    }
    Ok(bill)
}

/// Rejects an owner change to someone other than the caller unless admin
pub(crate) fn check_owner_assignment(auth: &AuthContext, user_id: Option<i64>) -> DomainResult<()> {
    match user_id {
        Some(owner) if !auth.can_access(owner) => Err(DomainError::Validation {
            message: "user_id must be the authenticated user".to_string(),
        }),
        _ => Ok(()),
    }
}
