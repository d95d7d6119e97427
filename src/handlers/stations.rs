//! Station handlers.
//!
//! Reads are public. Creating requires authentication; updating and deleting
//! require ownership.

use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::handlers::auth::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::ownership::{parse_resource_id, require_owner, OwnedResource};
use crate::models::{NewStation, Station, UpdateStation};
use crate::services::station;

fn station_not_found() -> AppError {
    AppError::NotFound("Station not found".to_string())
}

/// `GET /stations`
#[utoipa::path(
    get,
    path = "/stations",
    tag = "stations",
    responses((status = 200, description = "All stations", body = [Station]))
)]
pub async fn list_stations(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stations = station::list(&data.pool).await?;
    Ok(HttpResponse::Ok().json(stations))
}

/// `POST /stations` - the caller becomes the owner.
#[utoipa::path(
    post,
    path = "/stations",
    tag = "stations",
    request_body = NewStation,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Station created", body = Station),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "Station name taken", body = ErrorResponse)
    )
)]
pub async fn create_station(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    body: web::Json<NewStation>,
) -> AppResult<HttpResponse> {
    let new_station = body.validated()?;
    let station = station::create(&data.pool, auth.user_id, &new_station).await?;
    Ok(HttpResponse::Created().json(station))
}

/// `GET /stations/{id}`
#[utoipa::path(
    get,
    path = "/stations/{id}",
    tag = "stations",
    params(("id" = uuid::Uuid, Path, description = "Station id")),
    responses(
        (status = 200, description = "The station", body = Station),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such station", body = ErrorResponse)
    )
)]
pub async fn get_station(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_resource_id(&path)?;
    let station = station::find_by_id(&data.pool, id)
        .await?
        .ok_or_else(station_not_found)?;
    Ok(HttpResponse::Ok().json(station))
}

/// `PUT /stations/{id}` - partial update by the owner.
#[utoipa::path(
    put,
    path = "/stations/{id}",
    tag = "stations",
    params(("id" = uuid::Uuid, Path, description = "Station id")),
    request_body = UpdateStation,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated station", body = Station),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_station(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateStation>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::Station, &path).await?;
    let changes = body.validated()?;

    let station = station::update(&data.pool, id, &changes)
        .await?
        .ok_or_else(station_not_found)?;

    tracing::info!(station_id = %id, "Station updated");
    Ok(HttpResponse::Ok().json(station))
}

/// `DELETE /stations/{id}` - also removes the station's readings and webhooks.
#[utoipa::path(
    delete,
    path = "/stations/{id}",
    tag = "stations",
    params(("id" = uuid::Uuid, Path, description = "Station id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted station", body = Station),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_station(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::Station, &path).await?;
    let station = station::delete(&data.pool, id)
        .await?
        .ok_or_else(station_not_found)?;

    tracing::info!(station_id = %id, "Station deleted");
    Ok(HttpResponse::Ok().json(station))
}
