//! Bill service module
//!
//! Transactional create/update/delete workflows for the bill aggregate and
//! the business-rule validation that guards them.

mod service;
mod validation;

#[cfg(test)]
mod tests;

pub use service::BillService;
pub use validation::{validate_new_bill, AMOUNT_TOLERANCE};
