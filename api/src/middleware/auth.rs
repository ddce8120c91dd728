//! JWT bearer authentication for protected routes.
//!
//! The middleware reads the `Authorization: Bearer <token>` header, verifies
//! the access token and injects an [`AuthContext`] into the request
//! extensions for handlers to extract.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use bb_core::{
    domain::entities::{Claims, UserRole},
    errors::{DomainError, TokenError},
    repositories::RevocationStore,
    services::token::TokenService,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::debug;

use crate::handlers::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Subject of the access token
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the context from verified access-token claims
    pub fn from_claims(claims: &Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| DomainError::Token(TokenError::Invalid {
                reason: "subject is not a user id".to_string(),
            }))?;
        Ok(Self {
            user_id,
            username: claims.username.clone(),
            role: claims.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Whether the caller may see or change a resource owned by `owner_id`
    pub fn can_access(&self, owner_id: i64) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

/// Verifies access tokens for the middleware
pub trait AccessTokenVerifier: Send + Sync {
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError>;
}

impl<S: RevocationStore> AccessTokenVerifier for TokenService<S> {
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.validate(token)?;
        // Refresh tokens carry the same signature and audience
        if claims.is_refresh() {
            return Err(TokenError::Invalid {
                reason: "refresh tokens cannot be used for API access".to_string(),
            }
            .into());
        }
        Ok(claims)
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    verifier: Arc<dyn AccessTokenVerifier>,
}

impl JwtAuth {
    pub fn new(verifier: Arc<dyn AccessTokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn AccessTokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let context = match authenticate(&req, verifier.as_ref()) {
                Ok(context) => context,
                Err(e) => {
                    debug!(error = %e, "Bearer token rejected");
                    let response = ApiError(e).error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(context);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate(
    req: &ServiceRequest,
    verifier: &dyn AccessTokenVerifier,
) -> Result<AuthContext, DomainError> {
    let token = extract_bearer_token(req).ok_or(DomainError::Unauthorized)?;
    let claims = verifier.verify_access_token(&token)?;
    AuthContext::from_claims(&claims)
}

/// Extracts the Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for the authenticated caller
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(DomainError::Unauthorized).into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_empty), None);
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::User,
            iat: 0,
            exp: 0,
            iss: "billbook".to_string(),
            aud: "billbook-api".to_string(),
            jti: None,
            token_type: None,
        };
        assert!(AuthContext::from_claims(&claims).is_err());
    }

    #[test]
    fn test_admin_can_access_any_owner() {
        let admin = AuthContext {
            user_id: 1,
            username: "root".to_string(),
            role: UserRole::Admin,
        };
        let user = AuthContext {
            user_id: 2,
            username: "bob".to_string(),
            role: UserRole::User,
        };
        assert!(admin.can_access(2));
        assert!(user.can_access(2));
        assert!(!user.can_access(3));
    }
}
