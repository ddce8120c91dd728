//! MySQL repository implementations

mod bill_item_repository_impl;
mod bill_repository_impl;
mod user_repository_impl;

pub use bill_item_repository_impl::MySqlBillItemRepository;
pub use bill_repository_impl::MySqlBillRepository;
pub use user_repository_impl::MySqlUserRepository;

use bb_core::errors::DomainError;
use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};

/// Read a column, reporting the column name on failure
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", name, e)))
}

/// Unique-key violation reported by the driver
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Foreign-key violation reported by the driver
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
