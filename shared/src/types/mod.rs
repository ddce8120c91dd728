//! Type definitions shared by the core and presentation layers

pub mod pagination;

pub use pagination::{PaginatedResponse, Pagination};
