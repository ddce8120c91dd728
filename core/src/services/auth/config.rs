//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Minimum accepted password length at registration
    pub min_password_length: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            min_password_length: 8,
        }
    }
}
