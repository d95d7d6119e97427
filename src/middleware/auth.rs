//! Authentication middleware for JWT validation.
//!
//! This module provides:
//! - `AuthenticatedUser` extractor that validates bearer access tokens
//! - Automatic extraction of user ID and claims from valid tokens

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::ErrorResponse;
use crate::handlers::auth::AppState;
use crate::services::token::{verify_token, Claims, TokenError, TokenKind};

/// Represents an authenticated user extracted from a valid access token.
///
/// Use it as a handler argument on routes that require authentication.
/// Revoked, expired, malformed and refresh tokens are all rejected with 401
/// before the handler runs.
///
/// # Example
///
/// ```ignore
/// use crate::middleware::auth::AuthenticatedUser;
///
/// async fn protected_route(user: AuthenticatedUser) -> impl Responder {
///     format!("Hello, {}", user.claims.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The UUID of the authenticated user
    pub user_id: Uuid,
    /// Verified claims of the presented token
    pub claims: Claims,
    /// The raw bearer token, kept so logout can revoke it
    pub token: String,
}

/// Error type for authentication failures.
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader,
    /// Token validation failed
    InvalidToken,
    /// Token is on the blacklist
    RevokedToken,
    /// User ID in token is not a valid UUID
    InvalidUserId,
    /// App state not found
    MissingAppState,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing authorization token"),
            AuthError::InvalidHeader => write!(f, "Invalid authorization header format"),
            AuthError::InvalidToken => write!(f, "Invalid or expired token"),
            AuthError::RevokedToken => write!(f, "Token has been revoked"),
            AuthError::InvalidUserId => write!(f, "Invalid user ID in token"),
            AuthError::MissingAppState => write!(f, "Internal server error"),
        }
    }
}

impl actix_web::ResponseError for AuthError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidHeader
            | AuthError::InvalidToken
            | AuthError::RevokedToken
            | AuthError::InvalidUserId => actix_web::http::StatusCode::UNAUTHORIZED,
            AuthError::MissingAppState => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Revoked => AuthError::RevokedToken,
            TokenError::InvalidSubject => AuthError::InvalidUserId,
            _ => AuthError::InvalidToken,
        }
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidHeader),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(req)?;

    let app_state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(AuthError::MissingAppState)?;

    let claims = verify_token(
        &app_state.keys,
        &app_state.blacklist,
        token,
        TokenKind::Access,
    )
    .map_err(|e| {
        tracing::debug!("Rejected access token: {}", e);
        AuthError::from(e)
    })?;

    let user_id = claims.user_id()?;

    Ok(AuthenticatedUser {
        user_id,
        claims,
        token: token.to_string(),
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
