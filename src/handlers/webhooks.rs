//! Webhook registration handlers.
//!
//! Any authenticated user may subscribe to readings of any existing station.
//! The signing secret is returned once, in the registration response.

use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::handlers::auth::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::ownership::{require_owner, OwnedResource};
use crate::models::{NewWebhook, Webhook, WebhookCreated};
use crate::services::{station, webhook};

/// `GET /webhooks` - the caller's webhooks.
#[utoipa::path(
    get,
    path = "/webhooks",
    tag = "webhooks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's webhooks", body = [Webhook]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_webhooks(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let webhooks = webhook::list_for_owner(&data.pool, auth.user_id).await?;
    Ok(HttpResponse::Ok().json(webhooks))
}

/// `POST /webhooks`
#[utoipa::path(
    post,
    path = "/webhooks",
    tag = "webhooks",
    request_body = NewWebhook,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Webhook registered; the secret is shown only here", body = WebhookCreated),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such station", body = ErrorResponse)
    )
)]
pub async fn create_webhook(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    body: web::Json<NewWebhook>,
) -> AppResult<HttpResponse> {
    let new_webhook = body.validated()?;

    if station::find_by_id(&data.pool, new_webhook.station_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Station not found".to_string()));
    }

    let created = webhook::create(&data.pool, auth.user_id, &new_webhook).await?;
    Ok(HttpResponse::Created().json(WebhookCreated::from(created)))
}

/// `DELETE /webhooks/{id}`
#[utoipa::path(
    delete,
    path = "/webhooks/{id}",
    tag = "webhooks",
    params(("id" = uuid::Uuid, Path, description = "Webhook id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted webhook", body = Webhook),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_webhook(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::Webhook, &path).await?;
    let deleted = webhook::delete(&data.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Webhook not found".to_string()))?;

    tracing::info!(webhook_id = %id, "Webhook deleted");
    Ok(HttpResponse::Ok().json(deleted))
}
