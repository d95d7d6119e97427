//! Weather reading model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::validation::{self, ValidationError};

/// A single observation submitted for a station. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeatherReading {
    pub id: Uuid,

    pub station_id: Uuid,

    /// When the observation was made
    pub recorded_at: DateTime<Utc>,

    /// Degrees Celsius
    pub temperature: f64,

    /// Metres per second
    pub wind_speed: f64,

    /// Degrees clockwise from north, in `[0, 360)`
    pub wind_direction: f64,

    pub created_at: DateTime<Utc>,
}

/// Body of `POST /weather/stations/{id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewWeatherReading {
    /// Defaults to the time of ingestion
    pub recorded_at: Option<DateTime<Utc>>,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
}

impl NewWeatherReading {
    pub fn validated(&self) -> Result<NewWeatherReading, ValidationError> {
        let wind_direction = validation::in_range("wind_direction", self.wind_direction, 0.0, 360.0)?;
        Ok(NewWeatherReading {
            recorded_at: self.recorded_at,
            temperature: validation::in_range("temperature", self.temperature, -100.0, 100.0)?,
            wind_speed: validation::in_range("wind_speed", self.wind_speed, 0.0, 150.0)?,
            // 360 and 0 are the same bearing
            wind_direction: wind_direction % 360.0,
        })
    }
}

/// Query string for listing readings.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReadingsQuery {
    /// Maximum number of readings (default 50, at most 500)
    pub limit: Option<i64>,
}

impl ReadingsQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 500;

    /// Clamps the requested limit into `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, wind_speed: f64, wind_direction: f64) -> NewWeatherReading {
        NewWeatherReading {
            recorded_at: None,
            temperature,
            wind_speed,
            wind_direction,
        }
    }

    #[test]
    fn test_reading_validated() {
        let r = reading(-4.5, 3.2, 225.0).validated().expect("should validate");
        assert_eq!(r.temperature, -4.5);
        assert_eq!(r.wind_direction, 225.0);
    }

    #[test]
    fn test_north_is_normalized() {
        let r = reading(10.0, 1.0, 360.0).validated().expect("should validate");
        assert_eq!(r.wind_direction, 0.0);
    }

    #[test]
    fn test_reading_rejects_negative_wind() {
        assert!(matches!(
            reading(10.0, -1.0, 90.0).validated(),
            Err(ValidationError::OutOfRange {
                field: "wind_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_reading_rejects_non_finite() {
        assert_eq!(
            reading(f64::INFINITY, 1.0, 90.0).validated().unwrap_err(),
            ValidationError::NotFinite("temperature")
        );
    }

    #[test]
    fn test_reading_deserialization_with_timestamp() {
        let r: NewWeatherReading = serde_json::from_str(
            r#"{"recorded_at": "2024-05-01T12:00:00Z", "temperature": 12.5, "wind_speed": 4.0, "wind_direction": 180}"#,
        )
        .expect("Failed to deserialize");
        assert_eq!(
            r.recorded_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_readings_query_limit() {
        assert_eq!(ReadingsQuery { limit: None }.limit(), 50);
        assert_eq!(ReadingsQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(ReadingsQuery { limit: Some(10_000) }.limit(), 500);
        assert_eq!(ReadingsQuery { limit: Some(7) }.limit(), 7);
    }
}
