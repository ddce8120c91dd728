//! Domain entities representing core business objects.

pub mod bill;
pub mod bill_item;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use bill::{Bill, BillFilter, BillPatch, BillWithItems, CreateBillInput, NewBill};
pub use bill_item::{BillItem, BillItemInput, BillItemPatch, NetUnit, NewBillItem};
pub use token::{Claims, TokenPayload, REFRESH_TOKEN_TYPE};
pub use user::{NewUser, RegisterUserInput, User, UserRole, UserView};
