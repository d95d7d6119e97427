//! Client for SMHI open meteorological observations.
//!
//! Only air temperature (parameter 1) for the latest hour is used. The
//! upstream document looks like:
//!
//! ```json
//! {"station": [{"key": "159880", "name": "Arvidsjaur A",
//!               "latitude": 65.59, "longitude": 19.28,
//!               "value": [{"date": 1714564800000, "value": "-5.2", "quality": "G"}]}]}
//! ```
//!
//! `value` is `null` for stations without a recent observation.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::WeatherReading;

const LATEST_AIR_TEMPERATURE_PATH: &str = "parameter/1/station-set/all/period/latest-hour/data.json";

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error)]
pub enum SmhiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Invalid response from SMHI API")]
    InvalidResponse,
}

/// An official observation station with its latest air temperature.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OfficialStation {
    pub key: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius; `None` when the station reported nothing usable
    pub temperature: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

/// A local reading set against the nearest official station.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Comparison {
    pub local: WeatherReading,
    pub official: OfficialStation,
    pub distance_km: f64,
    /// Local minus official, in degrees Celsius
    pub temperature_difference: f64,
}

// Upstream response types

#[derive(Debug, Deserialize)]
struct LatestHourResponse {
    #[serde(default)]
    station: Vec<RawStation>,
}

#[derive(Debug, Deserialize)]
struct RawStation {
    key: serde_json::Value,
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    value: Option<Vec<RawValue>>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    /// Milliseconds since the Unix epoch
    date: Option<i64>,
    value: Option<serde_json::Value>,
}

/// Upstream values are usually strings; numbers are accepted too.
fn lenient_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn key_string(key: &serde_json::Value) -> String {
    match key {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<RawStation> for OfficialStation {
    fn from(raw: RawStation) -> Self {
        let latest = raw.value.as_ref().and_then(|values| values.last());
        let temperature = latest
            .and_then(|v| v.value.as_ref())
            .and_then(lenient_f64);
        let observed_at = latest
            .and_then(|v| v.date)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single());

        OfficialStation {
            key: key_string(&raw.key),
            name: raw.name,
            latitude: raw.latitude,
            longitude: raw.longitude,
            temperature,
            observed_at,
        }
    }
}

fn parse_latest_hour(body: &str) -> Result<Vec<OfficialStation>, SmhiError> {
    let parsed: LatestHourResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse SMHI response: {}", e);
        SmhiError::InvalidResponse
    })?;
    Ok(parsed.station.into_iter().map(OfficialStation::from).collect())
}

/// SMHI open data client
#[derive(Clone)]
pub struct SmhiClient {
    client: Client,
    base_url: String,
}

impl SmhiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches every station's latest-hour air temperature.
    pub async fn latest_air_temperatures(&self) -> Result<Vec<OfficialStation>, SmhiError> {
        let url = format!("{}/{}", self.base_url, LATEST_AIR_TEMPERATURE_PATH);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(SmhiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let stations = parse_latest_hour(&body)?;
        tracing::debug!(count = stations.len(), "Fetched official stations");
        Ok(stations)
    }
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Closest station to `(latitude, longitude)` that reported a temperature,
/// with its distance in kilometres.
pub fn nearest_with_reading(
    stations: &[OfficialStation],
    latitude: f64,
    longitude: f64,
) -> Option<(&OfficialStation, f64)> {
    stations
        .iter()
        .filter(|s| s.temperature.is_some())
        .map(|s| (s, haversine_km(latitude, longitude, s.latitude, s.longitude)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Pairs `local` (taken at `latitude`, `longitude`) with the nearest official
/// station. `None` when no official station has a temperature.
pub fn compare(
    local: WeatherReading,
    stations: &[OfficialStation],
    latitude: f64,
    longitude: f64,
) -> Option<Comparison> {
    let (official, distance_km) = nearest_with_reading(stations, latitude, longitude)?;
    let official_temperature = official.temperature?;
    Some(Comparison {
        temperature_difference: local.temperature - official_temperature,
        local,
        official: official.clone(),
        distance_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SAMPLE: &str = r#"{
        "updated": 1714568400000,
        "parameter": {"key": "1", "name": "Lufttemperatur", "unit": "degree celsius"},
        "station": [
            {"key": "64510", "name": "Växjö A", "owner": "SMHI", "height": 182.0,
             "latitude": 56.8554, "longitude": 14.8271,
             "value": [{"date": 1714564800000, "value": "8.4", "quality": "G"}]},
            {"key": "65090", "name": "Kalmar Flygplats", "owner": "SMHI", "height": 5.0,
             "latitude": 56.6856, "longitude": 16.2874,
             "value": [{"date": 1714561200000, "value": "9.0", "quality": "G"},
                       {"date": 1714564800000, "value": "9.6", "quality": "G"}]},
            {"key": "64020", "name": "Älmhult", "owner": "SMHI", "height": 140.0,
             "latitude": 56.5539, "longitude": 14.1372,
             "value": null},
            {"key": 63510, "name": "Ljungby", "owner": "SMHI", "height": 150.0,
             "latitude": 56.8434, "longitude": 13.9369,
             "value": [{"date": 1714564800000, "value": "n/a", "quality": "Y"}]}
        ]
    }"#;

    fn reading(temperature: f64) -> WeatherReading {
        WeatherReading {
            id: Uuid::new_v4(),
            station_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            temperature,
            wind_speed: 2.0,
            wind_direction: 270.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_latest_hour() {
        let stations = parse_latest_hour(SAMPLE).expect("sample should parse");
        assert_eq!(stations.len(), 4);

        let vaxjo = &stations[0];
        assert_eq!(vaxjo.key, "64510");
        assert_eq!(vaxjo.name, "Växjö A");
        assert_eq!(vaxjo.temperature, Some(8.4));
        assert_eq!(
            vaxjo.observed_at,
            Utc.timestamp_millis_opt(1714564800000).single()
        );
    }

    #[test]
    fn test_parse_uses_last_value() {
        let stations = parse_latest_hour(SAMPLE).unwrap();
        assert_eq!(stations[1].temperature, Some(9.6));
    }

    #[test]
    fn test_parse_missing_and_garbled_values() {
        let stations = parse_latest_hour(SAMPLE).unwrap();
        assert_eq!(stations[2].temperature, None);
        assert_eq!(stations[2].observed_at, None);
        // Numeric key and unparseable value
        assert_eq!(stations[3].key, "63510");
        assert_eq!(stations[3].temperature, None);
        assert!(stations[3].observed_at.is_some());
    }

    #[test]
    fn test_parse_invalid_document() {
        assert!(matches!(
            parse_latest_hour("<html>maintenance</html>"),
            Err(SmhiError::InvalidResponse)
        ));
        assert_eq!(parse_latest_hour("{}").unwrap().len(), 0);
    }

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(&serde_json::json!(" -3.5 ")), Some(-3.5));
        assert_eq!(lenient_f64(&serde_json::json!(12)), Some(12.0));
        assert_eq!(lenient_f64(&serde_json::json!("NaN")), None);
        assert_eq!(lenient_f64(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Stockholm to Gothenburg is roughly 398 km
        let d = haversine_km(59.3293, 18.0686, 57.7089, 11.9746);
        assert!((d - 398.0).abs() < 5.0, "got {}", d);
        assert_eq!(haversine_km(56.0, 14.0, 56.0, 14.0), 0.0);
    }

    #[test]
    fn test_nearest_skips_stations_without_reading() {
        let stations = parse_latest_hour(SAMPLE).unwrap();
        // Right on top of Älmhult, which has no value
        let (nearest, distance) =
            nearest_with_reading(&stations, 56.5539, 14.1372).expect("some station");
        assert_eq!(nearest.key, "64510");
        assert!(distance > 0.0);
    }

    #[test]
    fn test_nearest_with_no_readings() {
        let stations = parse_latest_hour(SAMPLE).unwrap();
        let without: Vec<_> = stations
            .into_iter()
            .filter(|s| s.temperature.is_none())
            .collect();
        assert!(nearest_with_reading(&without, 56.0, 14.0).is_none());
        assert!(nearest_with_reading(&[], 56.0, 14.0).is_none());
    }

    #[test]
    fn test_compare_difference_is_local_minus_official() {
        let stations = parse_latest_hour(SAMPLE).unwrap();
        let comparison =
            compare(reading(10.0), &stations, 56.68, 16.29).expect("comparison");
        assert_eq!(comparison.official.key, "65090");
        assert!((comparison.temperature_difference - 0.4).abs() < 1e-9);
        assert!(comparison.distance_km < 1.0);
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = SmhiClient::new(Client::new(), "http://localhost:9999/api/");
        assert_eq!(client.base_url(), "http://localhost:9999/api");
    }

    #[actix_web::test]
    async fn test_unreachable_upstream_is_request_error() {
        let client = SmhiClient::new(Client::new(), "http://127.0.0.1:1");
        let result = client.latest_air_temperatures().await;
        assert!(matches!(result, Err(SmhiError::Request(_))));
    }
}
