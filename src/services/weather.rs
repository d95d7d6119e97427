//! Weather reading service for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::weather::{NewWeatherReading, WeatherReading};

const READING_COLUMNS: &str =
    "id, station_id, recorded_at, temperature, wind_speed, wind_direction, created_at";

/// Stores a reading for `station_id`. A missing `recorded_at` defaults to now.
pub async fn create(
    pool: &PgPool,
    station_id: Uuid,
    reading: &NewWeatherReading,
) -> Result<WeatherReading, sqlx::Error> {
    sqlx::query_as::<_, WeatherReading>(&format!(
        r#"
        INSERT INTO weather_readings (station_id, recorded_at, temperature, wind_speed, wind_direction)
        VALUES ($1, COALESCE($2, NOW()), $3, $4, $5)
        RETURNING {}
        "#,
        READING_COLUMNS
    ))
    .bind(station_id)
    .bind(reading.recorded_at)
    .bind(reading.temperature)
    .bind(reading.wind_speed)
    .bind(reading.wind_direction)
    .fetch_one(pool)
    .await
}

/// Newest readings first, at most `limit`.
pub async fn list_for_station(
    pool: &PgPool,
    station_id: Uuid,
    limit: i64,
) -> Result<Vec<WeatherReading>, sqlx::Error> {
    sqlx::query_as::<_, WeatherReading>(&format!(
        r#"
        SELECT {} FROM weather_readings
        WHERE station_id = $1
        ORDER BY recorded_at DESC, created_at DESC
        LIMIT $2
        "#,
        READING_COLUMNS
    ))
    .bind(station_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn latest_for_station(
    pool: &PgPool,
    station_id: Uuid,
) -> Result<Option<WeatherReading>, sqlx::Error> {
    Ok(list_for_station(pool, station_id, 1).await?.into_iter().next())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<WeatherReading>, sqlx::Error> {
    sqlx::query_as::<_, WeatherReading>(&format!(
        "SELECT {} FROM weather_readings WHERE id = $1",
        READING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<WeatherReading>, sqlx::Error> {
    sqlx::query_as::<_, WeatherReading>(&format!(
        "DELETE FROM weather_readings WHERE id = $1 RETURNING {}",
        READING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Owner of the station a reading belongs to.
pub async fn owner_of(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT s.owner
        FROM weather_readings r
        JOIN stations s ON s.id = r.station_id
        WHERE r.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
