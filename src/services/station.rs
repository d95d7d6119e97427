//! Station service for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::station::{NewStation, Station, UpdateStation};

const STATION_COLUMNS: &str =
    "id, station_name, description, latitude, longitude, owner, created_at, updated_at";

/// Lists all stations, oldest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Station>, sqlx::Error> {
    sqlx::query_as::<_, Station>(&format!(
        "SELECT {} FROM stations ORDER BY created_at, station_name",
        STATION_COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Station>, sqlx::Error> {
    sqlx::query_as::<_, Station>(&format!(
        "SELECT {} FROM stations WHERE id = $1",
        STATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Creates a station owned by `owner`.
pub async fn create(
    pool: &PgPool,
    owner: Uuid,
    new_station: &NewStation,
) -> Result<Station, sqlx::Error> {
    let station = sqlx::query_as::<_, Station>(&format!(
        r#"
        INSERT INTO stations (station_name, description, latitude, longitude, owner)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        STATION_COLUMNS
    ))
    .bind(&new_station.station_name)
    .bind(&new_station.description)
    .bind(new_station.latitude)
    .bind(new_station.longitude)
    .bind(owner)
    .fetch_one(pool)
    .await?;

    tracing::info!(station_id = %station.id, owner = %owner, "Station created");
    Ok(station)
}

/// Applies a partial update. Returns `None` if the station does not exist.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &UpdateStation,
) -> Result<Option<Station>, sqlx::Error> {
    sqlx::query_as::<_, Station>(&format!(
        r#"
        UPDATE stations SET
            station_name = COALESCE($2, station_name),
            description = COALESCE($3, description),
            latitude = COALESCE($4, latitude),
            longitude = COALESCE($5, longitude),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        STATION_COLUMNS
    ))
    .bind(id)
    .bind(&changes.station_name)
    .bind(&changes.description)
    .bind(changes.latitude)
    .bind(changes.longitude)
    .fetch_optional(pool)
    .await
}

/// Deletes a station together with its readings and webhooks.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Station>, sqlx::Error> {
    sqlx::query_as::<_, Station>(&format!(
        "DELETE FROM stations WHERE id = $1 RETURNING {}",
        STATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Owner of a station, `None` if the station does not exist.
pub async fn owner_of(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT owner FROM stations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}
