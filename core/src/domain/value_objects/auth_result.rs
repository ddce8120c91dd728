//! Results of the authentication use cases.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserView;

/// Result of a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// Sanitized user profile
    pub user: UserView,
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Result of a successful token refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}
