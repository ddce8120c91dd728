use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use bb_core::errors::{AuthError, DomainError, TokenError};
use bb_shared::ErrorResponse;
use tracing::error;
use validator::ValidationErrors;

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::Bill(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials
            | AuthError::MissingSubject
            | AuthError::RefreshTokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::RefreshTokenInvalid | AuthError::RefreshTokenRevoked => {
                StatusCode::FORBIDDEN
            }
            AuthError::UsernameTaken => StatusCode::CONFLICT,
        },
        DomainError::Token(token) => match token {
            TokenError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            TokenError::Expired
            | TokenError::Invalid { .. }
            | TokenError::InvalidTokenType { .. }
            | TokenError::InvalidIssuerAudience => StatusCode::UNAUTHORIZED,
            TokenError::Revoked => StatusCode::FORBIDDEN,
            TokenError::GenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        },
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the JSON error response for a domain error
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);
    if status.is_server_error() {
        error!(error = %error, "Request failed");
    }
    HttpResponse::build(status).json(ErrorResponse::from(&error))
}

/// Shape validation failures of a request body
pub fn validation_error(errors: ValidationErrors) -> DomainError {
    DomainError::Validation {
        message: errors.to_string(),
    }
}

/// Domain error raised outside a handler, e.g. by middleware or extractors
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(&self.0))
    }
}
