//! Authentication handlers.
//!
//! This module provides the following endpoints:
//! - `POST /auth/register` - Creates a user account
//! - `POST /auth/login` - Exchanges username and passphrase for a token pair
//! - `POST /auth/refresh` - Exchanges a refresh token for a new access token
//! - `POST /auth/logout` - Revokes the caller's access and refresh tokens

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{NewUser, User};
use crate::services::blacklist::TokenBlacklist;
use crate::services::smhi::SmhiClient;
use crate::services::token::{
    create_token, issue_token_pair, verify_token, TokenKeys, TokenKind, TokenPair,
};
use crate::services::user;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: PgPool,
    /// Application configuration
    pub config: Config,
    /// HTTP client for outgoing requests (SMHI, webhooks)
    pub http_client: reqwest::Client,
    /// Token signing and verification keys
    pub keys: Arc<TokenKeys>,
    /// Revoked tokens, shared with the sweep task
    pub blacklist: Arc<TokenBlacklist>,
    /// Official weather data client
    pub smhi: SmhiClient,
}

/// Request body for the login endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub passphrase: String,
}

/// Request body for the refresh and logout endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// The refresh token issued at login
    pub refresh_token: String,
}

/// Response from the refresh endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// New access token
    pub access_token: String,
    #[schema(value_type = String, example = "Bearer")]
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Confirmation returned by logout.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Registers a new user.
///
/// # Returns
///
/// 201 with the public view of the user. 409 if the username or email is
/// already taken.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    )
)]
pub async fn register(
    data: web::Data<AppState>,
    body: web::Json<NewUser>,
) -> AppResult<HttpResponse> {
    let new_user = body.validated()?;
    let user = user::create(&data.pool, &new_user).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticates with username and passphrase.
///
/// Unknown usernames and wrong passphrases produce the same 401.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair", body = TokenPair),
        (status = 401, description = "Invalid username or passphrase", body = ErrorResponse)
    )
)]
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let user = user::authenticate(&data.pool, &body.username, &body.passphrase)
        .await?
        .ok_or_else(|| {
            tracing::debug!(username = %body.username, "Failed login attempt");
            AppError::Unauthorized("Invalid username or passphrase".to_string())
        })?;

    let pair = issue_token_pair(
        &data.keys,
        &user,
        data.config.jwt_access_token_expiry_secs,
        data.config.jwt_refresh_token_expiry_secs,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(HttpResponse::Ok().json(pair))
}

/// Issues a new access token for a valid, unrevoked refresh token.
///
/// The token's subject must still exist; deleted users cannot refresh.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token", body = ErrorResponse)
    )
)]
pub async fn refresh(
    data: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> AppResult<HttpResponse> {
    let claims = verify_token(
        &data.keys,
        &data.blacklist,
        &body.refresh_token,
        TokenKind::Refresh,
    )?;
    let user_id = claims.user_id()?;

    let user = user::find_by_id(&data.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    let access_token = create_token(
        &data.keys,
        &user,
        TokenKind::Access,
        data.config.jwt_access_token_expiry_secs,
    )?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        token_type: "Bearer",
        expires_in: data.config.jwt_access_token_expiry_secs,
    }))
}

/// Revokes the bearer access token and the refresh token in the body.
///
/// The refresh token must be valid and belong to the caller, otherwise
/// nothing is revoked.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    request_body = RefreshRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Both tokens revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Refresh token belongs to another user", body = ErrorResponse)
    )
)]
pub async fn logout(
    user: AuthenticatedUser,
    data: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> AppResult<HttpResponse> {
    let refresh_claims = verify_token(
        &data.keys,
        &data.blacklist,
        &body.refresh_token,
        TokenKind::Refresh,
    )?;

    if refresh_claims.user_id()? != user.user_id {
        return Err(AppError::Forbidden(
            "Refresh token belongs to another user".to_string(),
        ));
    }

    data.blacklist.revoke(&user.token, user.claims.exp);
    data.blacklist.revoke(&body.refresh_token, refresh_claims.exp);

    tracing::info!(user_id = %user.user_id, "User logged out");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialization() {
        let json = r#"{"username": "njord", "passphrase": "north wind blows"}"#;
        let req: LoginRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.username, "njord");
        assert_eq!(req.passphrase, "north wind blows");
    }

    #[test]
    fn test_refresh_request_deserialization() {
        let json = r#"{"refresh_token": "eyJhbGciOiJSUzI1NiJ9.e30.sig"}"#;
        let req: RefreshRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.refresh_token, "eyJhbGciOiJSUzI1NiJ9.e30.sig");
    }

    #[test]
    fn test_refresh_response_serialization() {
        let response = RefreshResponse {
            access_token: "new_access_token".to_string(),
            token_type: "Bearer",
            expires_in: 900,
        };
        let json = serde_json::to_string(&response).expect("Failed to serialize");
        assert!(json.contains("\"access_token\":\"new_access_token\""));
        assert!(json.contains("\"token_type\":\"Bearer\""));
        assert!(json.contains("\"expires_in\":900"));
    }
}
