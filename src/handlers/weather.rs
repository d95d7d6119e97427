//! Weather reading handlers and the official data comparison.
//!
//! This module provides the following endpoints:
//! - `POST /weather/stations/{id}` - Submit a reading (station owner only)
//! - `GET /weather/stations/{id}` - Latest readings, newest first
//! - `GET /weather/stations/{id}/current` - The newest reading
//! - `GET /weather/stations/{id}/compare` - Newest reading vs. nearest SMHI station
//! - `GET /weather/official/stations` - SMHI stations with their latest temperature
//! - `GET /weather/{id}` - A single reading
//! - `DELETE /weather/{id}` - Remove a reading (station owner only)

use std::time::Duration;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::handlers::auth::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::ownership::{parse_resource_id, require_owner, OwnedResource};
use crate::models::{NewWeatherReading, ReadingsQuery, Station, WeatherReading};
use crate::services::smhi::{Comparison, OfficialStation};
use crate::services::{smhi, station, weather, webhook};

async fn existing_station(data: &AppState, raw_id: &str) -> AppResult<Station> {
    let id = parse_resource_id(raw_id)?;
    station::find_by_id(&data.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Station not found".to_string()))
}

fn no_readings(station_id: Uuid) -> AppError {
    AppError::NotFound(format!("No readings for station {}", station_id))
}

/// `POST /weather/stations/{id}`
///
/// Webhooks registered for the station are notified in the background; the
/// response does not wait for them.
#[utoipa::path(
    post,
    path = "/weather/stations/{id}",
    tag = "weather",
    params(("id" = Uuid, Path, description = "Station id")),
    request_body = NewWeatherReading,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Reading stored", body = WeatherReading),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn create_reading(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewWeatherReading>,
) -> AppResult<HttpResponse> {
    let station_id = require_owner(&data.pool, &auth, OwnedResource::Station, &path).await?;
    let new_reading = body.validated()?;

    let reading = weather::create(&data.pool, station_id, &new_reading).await?;
    tracing::info!(reading_id = %reading.id, %station_id, "Reading stored");

    let pool = data.pool.clone();
    let client = data.http_client.clone();
    let timeout = Duration::from_secs(data.config.webhook_timeout_secs);
    let notified = reading.clone();
    tokio::spawn(async move {
        webhook::notify_webhooks(&pool, &client, &notified, timeout).await;
    });

    Ok(HttpResponse::Created().json(reading))
}

/// `GET /weather/stations/{id}?limit=N`
#[utoipa::path(
    get,
    path = "/weather/stations/{id}",
    tag = "weather",
    params(("id" = Uuid, Path, description = "Station id"), ReadingsQuery),
    responses(
        (status = 200, description = "Readings, newest first", body = [WeatherReading]),
        (status = 400, description = "Malformed id or limit", body = ErrorResponse),
        (status = 404, description = "No such station", body = ErrorResponse)
    )
)]
pub async fn list_readings(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ReadingsQuery>,
) -> AppResult<HttpResponse> {
    let station = existing_station(&data, &path).await?;
    let readings = weather::list_for_station(&data.pool, station.id, query.limit()).await?;
    Ok(HttpResponse::Ok().json(readings))
}

/// `GET /weather/stations/{id}/current`
#[utoipa::path(
    get,
    path = "/weather/stations/{id}/current",
    tag = "weather",
    params(("id" = Uuid, Path, description = "Station id")),
    responses(
        (status = 200, description = "Newest reading", body = WeatherReading),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such station or no readings", body = ErrorResponse)
    )
)]
pub async fn current_reading(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let station = existing_station(&data, &path).await?;
    let reading = weather::latest_for_station(&data.pool, station.id)
        .await?
        .ok_or_else(|| no_readings(station.id))?;
    Ok(HttpResponse::Ok().json(reading))
}

/// `GET /weather/stations/{id}/compare`
///
/// Compares the station's newest reading with the nearest official station
/// that reported a temperature in the last hour.
#[utoipa::path(
    get,
    path = "/weather/stations/{id}/compare",
    tag = "weather",
    params(("id" = Uuid, Path, description = "Station id")),
    responses(
        (status = 200, description = "Comparison with the nearest official station", body = Comparison),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No station, no readings or no official temperature", body = ErrorResponse),
        (status = 502, description = "Official data unavailable", body = ErrorResponse)
    )
)]
pub async fn compare_with_official(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let station = existing_station(&data, &path).await?;
    let reading = weather::latest_for_station(&data.pool, station.id)
        .await?
        .ok_or_else(|| no_readings(station.id))?;

    let official = data.smhi.latest_air_temperatures().await?;
    let comparison = smhi::compare(reading, &official, station.latitude, station.longitude)
        .ok_or_else(|| {
            AppError::NotFound("No official station has a current temperature".to_string())
        })?;

    Ok(HttpResponse::Ok().json(comparison))
}

/// `GET /weather/official/stations`
#[utoipa::path(
    get,
    path = "/weather/official/stations",
    tag = "weather",
    responses(
        (status = 200, description = "Official stations with their latest temperature", body = [OfficialStation]),
        (status = 502, description = "Official data unavailable", body = ErrorResponse)
    )
)]
pub async fn official_stations(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stations = data.smhi.latest_air_temperatures().await?;
    Ok(HttpResponse::Ok().json(stations))
}

/// `GET /weather/{id}`
#[utoipa::path(
    get,
    path = "/weather/{id}",
    tag = "weather",
    params(("id" = Uuid, Path, description = "Reading id")),
    responses(
        (status = 200, description = "The reading", body = WeatherReading),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such reading", body = ErrorResponse)
    )
)]
pub async fn get_reading(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_resource_id(&path)?;
    let reading = weather::find_by_id(&data.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Weather reading not found".to_string()))?;
    Ok(HttpResponse::Ok().json(reading))
}

/// `DELETE /weather/{id}`
#[utoipa::path(
    delete,
    path = "/weather/{id}",
    tag = "weather",
    params(("id" = Uuid, Path, description = "Reading id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted reading", body = WeatherReading),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_reading(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = require_owner(&data.pool, &auth, OwnedResource::WeatherReading, &path).await?;
    let reading = weather::delete(&data.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Weather reading not found".to_string()))?;

    tracing::info!(reading_id = %id, "Reading deleted");
    Ok(HttpResponse::Ok().json(reading))
}
