//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and migrations
//! - The transactional unit of work for the bill aggregate
//! - Repository implementations bound to a transaction or to the pool

pub mod connection;
pub mod mysql;
pub mod unit_of_work;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlBillItemRepository, MySqlBillRepository, MySqlUserRepository};
pub use unit_of_work::MySqlUnitOfWork;
