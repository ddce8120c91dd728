//! In-memory adapters for the repository and store traits.
//!
//! Used by the test suites of every crate and by local runs without MySQL or Redis.

mod bill_store;
mod revocation;
mod user;

#[cfg(test)]
mod tests;

pub use bill_store::{InMemoryBillStore, InMemoryUnitOfWork};
pub use revocation::{InMemoryRevocationStore, NoopRevocationStore};
pub use user::InMemoryUserRepository;
