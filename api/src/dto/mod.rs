//! Request and response bodies of the HTTP surface

pub mod auth;
pub mod bill;

pub use auth::{
    LoginRequest, LoginResponse, LogoutRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, TokenResponse,
};
pub use bill::{BillQuery, CreateBillRequest};
