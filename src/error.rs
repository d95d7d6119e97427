//! Unified error handling for the njordbreeze API.
//!
//! `AppError` is the error type every handler returns. It maps each failure
//! class onto an HTTP status and a JSON `{"error": "..."}` body.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::ConfigError;
use crate::services::smhi::SmhiError;
use crate::services::token::TokenError;
use crate::validation::ValidationError;

/// SQLSTATE for unique constraint violations.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for foreign key violations.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Controls whether 500-class responses carry the underlying message.
///
/// Set once at startup; only development deployments should enable it.
pub fn expose_internal_errors(enabled: bool) {
    EXPOSE_INTERNAL_ERRORS.store(enabled, Ordering::Relaxed);
}

fn internal_errors_exposed() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed)
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Unified application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database errors from SQLx
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Official weather data could not be fetched
    #[error("Upstream error: {0}")]
    Upstream(#[from] SmhiError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violations
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    let what = db_err
                        .constraint()
                        .map(describe_constraint)
                        .unwrap_or("value");
                    return AppError::Conflict(format!("That {} is already in use", what));
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return AppError::NotFound("Referenced resource not found".to_string());
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => AppError::Internal(format!("Failed to sign token: {}", e)),
            TokenError::InvalidKey(e) => AppError::Internal(format!("Invalid signing key: {}", e)),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Turns a postgres constraint name into a field description for clients.
fn describe_constraint(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "username",
        "users_email_key" => "email",
        "stations_station_name_key" => "station name",
        _ => "value",
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Config(_) => {
                tracing::error!("{}", self);
                if internal_errors_exposed() {
                    self.to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
            AppError::Upstream(e) => {
                tracing::warn!("Official weather data unavailable: {}", e);
                "Official weather data is currently unavailable".to_string()
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_message,
        })
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(err: &AppError) -> serde_json::Value {
        let bytes = err
            .error_response()
            .into_body()
            .try_into_bytes()
            .expect("body should be in memory");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Unauthorized("Invalid token".to_string());
        assert_eq!(format!("{}", err), "Unauthorized: Invalid token");

        let err = AppError::Forbidden("Not yours".to_string());
        assert_eq!(format!("{}", err), "Forbidden: Not yours");

        let err = AppError::NotFound("Station not found".to_string());
        assert_eq!(format!("{}", err), "Not found: Station not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthorized("t".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("t".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::BadRequest("t".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("t".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("t".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("t".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream(SmhiError::InvalidResponse).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_token_error_maps_to_unauthorized() {
        let err: AppError = TokenError::Revoked.into();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err: AppError = TokenError::WrongKind.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::Conflict("That username is already in use".to_string());
        assert_eq!(body_json(&err)["error"], "That username is already in use");
    }

    #[test]
    fn test_describe_constraint() {
        assert_eq!(describe_constraint("users_username_key"), "username");
        assert_eq!(describe_constraint("users_email_key"), "email");
        assert_eq!(describe_constraint("stations_station_name_key"), "station name");
        assert_eq!(describe_constraint("something_else"), "value");
    }

    #[test]
    fn test_error_response_hides_internal_details() {
        // The exposure flag is process-wide; only the default is asserted here.
        let err = AppError::Internal("sensitive database details".to_string());
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        if !internal_errors_exposed() {
            assert_eq!(body_json(&err)["error"], "Internal server error");
        }
    }
}
