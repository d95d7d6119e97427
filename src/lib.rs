//! njordbreeze-api - Personal weather station API
//!
//! Users register weather stations, submit readings, subscribe webhooks to
//! new readings and compare their measurements with official SMHI data.
//! Access is controlled with RS256 JWTs, a revocation blacklist and
//! per-resource ownership checks.
//!
//! # Modules
//!
//! - [`config`] - Application configuration from environment variables
//! - [`db`] - Database connection pool and migrations
//! - [`error`] - Unified error handling
//! - [`validation`] - Field validation for request bodies
//! - [`models`] - Database models (User, Station, WeatherReading, Webhook)
//! - [`services`] - Business logic (tokens, blacklist, resources, SMHI client)
//! - [`handlers`] - HTTP route handlers
//! - [`middleware`] - Authentication, ownership and rate limiting
//! - [`routes`] - Route table
//! - [`openapi`] - OpenAPI document and `/docs`
//!
//! # Quick Start
//!
//! ```ignore
//! use njordbreeze_api::{routes, AppState, Config};
//!
//! App::new()
//!     .app_data(web::Data::new(state))
//!     .service(routes::auth_scope())
//!     .configure(routes::configure)
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::{Config, ConfigError, Environment};
pub use db::{create_pool, run_migrations};
pub use error::{AppError, AppResult};
pub use handlers::auth::AppState;
pub use models::{Station, User, WeatherReading, Webhook};
pub use services::{
    Claims, OfficialStation, SmhiClient, SmhiError, TokenBlacklist, TokenError, TokenKeys,
    TokenKind, TokenPair,
};
