//! HTTP handlers for the njordbreeze API.
//!
//! This module contains all the route handlers:
//! - `auth` - Registration, login, token refresh and logout
//! - `health` - Service root and health check
//! - `users` - Account read, update and delete
//! - `stations` - Weather station CRUD
//! - `weather` - Readings and the official data comparison
//! - `webhooks` - Webhook registration

pub mod auth;
pub mod health;
pub mod stations;
pub mod users;
pub mod weather;
pub mod webhooks;

// Re-export commonly used types
pub use auth::{login, logout, refresh, register, AppState, LoginRequest, RefreshRequest};
pub use health::{health_check, index, HealthResponse};
pub use stations::{create_station, delete_station, get_station, list_stations, update_station};
pub use users::{delete_user, get_user, update_user};
pub use weather::{
    compare_with_official, create_reading, current_reading, delete_reading, get_reading,
    list_readings, official_stations,
};
pub use webhooks::{create_webhook, delete_webhook, list_webhooks};
