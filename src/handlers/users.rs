//! User account handlers. Every route is restricted to the account owner.

use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::handlers::auth::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::ownership::{require_owner, OwnedResource};
use crate::models::{UpdateUser, User};
use crate::services::user;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// `GET /users/{id}`
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::User, &path).await?;
    let user = user::find_by_id(&data.pool, id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(user))
}

/// `PUT /users/{id}` - partial update.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = UpdateUser,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateUser>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::User, &path).await?;

    let changes = body.validated()?;
    if changes.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let user = user::update(&data.pool, id, &changes)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %id, "User updated");
    Ok(HttpResponse::Ok().json(user))
}

/// `DELETE /users/{id}` - removes the account with everything it owns.
///
/// The access token used for the request is revoked as well.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted user", body = User),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::User, &path).await?;
    let user = user::delete(&data.pool, id)
        .await?
        .ok_or_else(user_not_found)?;

    data.blacklist.revoke(&auth.token, auth.claims.exp);

    tracing::info!(user_id = %id, "User deleted");
    Ok(HttpResponse::Ok().json(user))
}
