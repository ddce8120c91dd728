//! CORS policy built from `CorsConfig`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use bb_shared::CorsConfig;
use tracing::info;

/// Creates the CORS middleware for the configured origins
///
/// A `"*"` entry accepts any origin; an empty list accepts none.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|s| s.trim()) {
            if !origin.is_empty() {
                info!(origin, "Adding allowed origin");
                cors = cors.allowed_origin(origin);
            }
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
