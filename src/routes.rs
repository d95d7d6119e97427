//! Route table.
//!
//! The `/auth` scope is built separately so the server can wrap it in the
//! rate limiter; everything else is registered through [`configure`].

use actix_web::{web, Scope};
use utoipa_rapidoc::RapiDoc;

use crate::error::AppError;
use crate::handlers::{auth, health, stations, users, weather, webhooks};
use crate::openapi;

/// Malformed bodies, paths and query strings become JSON 400s.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    }));
}

/// `/auth` routes: register, login, refresh, logout.
pub fn auth_scope() -> Scope {
    web::scope("/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/refresh", web::post().to(auth::refresh))
        .route("/logout", web::post().to(auth::logout))
}

/// Registers every route except the `/auth` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);

    cfg.route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::health_check))
        .route(openapi::OPENAPI_PATH, web::get().to(openapi::openapi_json))
        .service(RapiDoc::new(openapi::OPENAPI_PATH).path(openapi::DOCS_PATH))
        .service(
            web::scope("/users")
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::update_user))
                .route("/{id}", web::delete().to(users::delete_user)),
        )
        .service(
            web::scope("/stations")
                .route("", web::get().to(stations::list_stations))
                .route("", web::post().to(stations::create_station))
                .route("/{id}", web::get().to(stations::get_station))
                .route("/{id}", web::put().to(stations::update_station))
                .route("/{id}", web::delete().to(stations::delete_station)),
        )
        .service(
            web::scope("/weather")
                .route("/official/stations", web::get().to(weather::official_stations))
                .route("/stations/{id}", web::post().to(weather::create_reading))
                .route("/stations/{id}", web::get().to(weather::list_readings))
                .route("/stations/{id}/current", web::get().to(weather::current_reading))
                .route(
                    "/stations/{id}/compare",
                    web::get().to(weather::compare_with_official),
                )
                .route("/{id}", web::get().to(weather::get_reading))
                .route("/{id}", web::delete().to(weather::delete_reading)),
        )
        .service(
            web::scope("/webhooks")
                .route("", web::get().to(webhooks::list_webhooks))
                .route("", web::post().to(webhooks::create_webhook))
                .route("/{id}", web::delete().to(webhooks::delete_webhook)),
        );
}
