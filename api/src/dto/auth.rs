use bb_core::domain::entities::user::{RegisterUserInput, UserView};
use bb_core::domain::value_objects::{LoginResult, RefreshResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    /// Minimum length is enforced by the auth service
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl From<RegisterRequest> for RegisterUserInput {
    fn from(req: RegisterRequest) -> Self {
        RegisterUserInput {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

impl From<RefreshResult> for TokenResponse {
    fn from(result: RefreshResult) -> Self {
        Self::bearer(result.access_token, result.refresh_token, result.expires_in)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserView,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            user: result.user,
            tokens: TokenResponse::bearer(
                result.access_token,
                result.refresh_token,
                result.expires_in,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
