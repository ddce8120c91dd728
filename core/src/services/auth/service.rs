//! Main authentication service implementation

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::entities::token::TokenPayload;
use crate::domain::entities::user::{NewUser, RegisterUserInput, UserRole, UserView};
use crate::domain::value_objects::{LoginResult, RefreshResult};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{RevocationStore, UserRepository};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::hasher::PasswordHasher;

/// Password hashed once and compared against when the username is unknown
const DECOY_PASSWORD: &str = "billbook-decoy-password";

/// Authentication service for login, refresh, logout and registration
pub struct AuthService<U, H, S>
where
    U: UserRepository,
    H: PasswordHasher,
    S: RevocationStore,
{
    /// User repository for account lookups
    user_repository: Arc<U>,
    /// Password hashing port
    password_hasher: Arc<H>,
    /// Token service for JWT management
    token_service: Arc<TokenService<S>>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Digest of `DECOY_PASSWORD` made with the configured hasher
    decoy_digest: OnceCell<String>,
}

impl<U, H, S> AuthService<U, H, S>
where
    U: UserRepository,
    H: PasswordHasher,
    S: RevocationStore,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `password_hasher` - Hasher used for registration and login
    /// * `token_service` - Service for JWT token management
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        password_hasher: Arc<H>,
        token_service: Arc<TokenService<S>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
            config,
            decoy_digest: OnceCell::new(),
        }
    }

    /// Authenticate with username and password
    ///
    /// An unknown username and a wrong password fail with the same
    /// `InvalidCredentials` error. Both paths run a password comparison.
    ///
    /// # Returns
    ///
    /// The sanitized user, an access token, a refresh token and the access
    /// token lifetime in seconds
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<LoginResult> {
        let user = match self.user_repository.find_by_username(username).await? {
            Some(user) => user,
            None => {
                self.compare_against_decoy(password).await;
                debug!("Login rejected: unknown username");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self
            .password_hasher
            .compare(password, &user.password_hash)
            .await?
        {
            debug!(user_id = user.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let payload = TokenPayload::from(&user);
        let access_token = self.token_service.generate_access_token(&payload)?;
        let refresh_token = self.token_service.generate_refresh_token(&payload)?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginResult {
            user: user.to_view(),
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_ttl_seconds(),
        })
    }

    /// Issue a new access token and refresh token from a refresh token
    ///
    /// The presented refresh token is not revoked.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<RefreshResult> {
        let claims = self
            .token_service
            .validate_refresh_token(refresh_token)
            .await
            .map_err(Self::map_refresh_error)?;

        if claims.sub.trim().is_empty() {
            return Err(AuthError::MissingSubject.into());
        }

        let payload = claims.payload();
        let access_token = self.token_service.generate_access_token(&payload)?;
        let refresh_token = self.token_service.generate_refresh_token(&payload)?;

        debug!(sub = %payload.sub, "Tokens refreshed");
        Ok(RefreshResult {
            access_token,
            refresh_token,
            expires_in: self.token_service.access_token_ttl_seconds(),
        })
    }

    /// Revoke a refresh token
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        self.token_service
            .revoke_refresh_token(refresh_token)
            .await
            .map_err(Self::map_refresh_error)
    }

    /// Register a new account with the `user` role
    pub async fn register(&self, input: RegisterUserInput) -> DomainResult<UserView> {
        if input.password.chars().count() < self.config.min_password_length {
            return Err(DomainError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        if self
            .user_repository
            .exists_by_username(&input.username)
            .await?
        {
            return Err(AuthError::UsernameTaken.into());
        }

        let password_hash = self.password_hasher.hash(&input.password).await?;
        let user = self
            .user_repository
            .create(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                role: UserRole::User,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        Ok(user.to_view())
    }

    /// Spend the same hashing work as a real comparison
    async fn compare_against_decoy(&self, password: &str) {
        let digest = self
            .decoy_digest
            .get_or_try_init(|| self.password_hasher.hash(DECOY_PASSWORD))
            .await;
        match digest {
            Ok(digest) => {
                let _ = self.password_hasher.compare(password, digest).await;
            }
            Err(e) => warn!(error = %e, "Could not hash the decoy password"),
        }
    }

    fn map_refresh_error(error: DomainError) -> DomainError {
        match error {
            DomainError::Token(TokenError::Expired) => AuthError::RefreshTokenExpired.into(),
            DomainError::Token(
                TokenError::Invalid { .. }
                | TokenError::InvalidTokenType { .. }
                | TokenError::InvalidIssuerAudience,
            ) => AuthError::RefreshTokenInvalid.into(),
            DomainError::Token(TokenError::Revoked) => AuthError::RefreshTokenRevoked.into(),
            other => {
                warn!(error = %other, "Refresh token handling failed");
                DomainError::internal("Failed to refresh token")
            }
        }
    }
}
