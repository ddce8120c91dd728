//! # Billbook API
//!
//! actix-web presentation layer: auth and bill routes, the JWT bearer
//! middleware, request DTOs and the mapping of domain errors to HTTP.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use routes::AppState;
