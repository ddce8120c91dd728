//! Business services containing domain logic and use cases.

pub mod auth;
pub mod bill;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, PasswordHasher, PlainTextHasher};
pub use bill::{validate_new_bill, BillService, AMOUNT_TOLERANCE};
pub use token::{parse_duration, TokenService, TokenServiceConfig};
