//! Data models for the njordbreeze API.
//!
//! - [`User`] - A registered user
//! - [`Station`] - A personal weather station owned by a user
//! - [`WeatherReading`] - One observation from a station
//! - [`Webhook`] - A URL notified about new readings

pub mod station;
pub mod user;
pub mod weather;
pub mod webhook;

pub use station::{NewStation, Station, UpdateStation};
pub use user::{NewUser, UpdateUser, User};
pub use weather::{NewWeatherReading, ReadingsQuery, WeatherReading};
pub use webhook::{NewWebhook, Webhook, WebhookCreated};
