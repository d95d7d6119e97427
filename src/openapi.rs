//! OpenAPI document for the HTTP API.
//!
//! Served as JSON at `/openapi.json` and rendered interactively at `/docs`.

use actix_web::{HttpResponse, Responder};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::handlers::{auth, health, stations, users, weather, webhooks};
use crate::models::{
    NewStation, NewUser, NewWeatherReading, NewWebhook, Station, UpdateStation, UpdateUser, User,
    WeatherReading, Webhook, WebhookCreated,
};
use crate::services::smhi::{Comparison, OfficialStation};
use crate::services::token::TokenPair;

/// Path of the JSON document.
pub const OPENAPI_PATH: &str = "/openapi.json";
/// Path of the interactive documentation.
pub const DOCS_PATH: &str = "/docs";

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "njordbreeze API",
        description = "Personal weather stations, their readings and a comparison with official SMHI observations."
    ),
    paths(
        health::index,
        health::health_check,
        auth::register,
        auth::login,
        auth::refresh,
        auth::logout,
        users::get_user,
        users::update_user,
        users::delete_user,
        stations::list_stations,
        stations::create_station,
        stations::get_station,
        stations::update_station,
        stations::delete_station,
        weather::create_reading,
        weather::list_readings,
        weather::current_reading,
        weather::compare_with_official,
        weather::official_stations,
        weather::get_reading,
        weather::delete_reading,
        webhooks::list_webhooks,
        webhooks::create_webhook,
        webhooks::delete_webhook,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        health::IndexResponse,
        health::Links,
        auth::LoginRequest,
        auth::RefreshRequest,
        auth::RefreshResponse,
        auth::MessageResponse,
        TokenPair,
        User,
        NewUser,
        UpdateUser,
        Station,
        NewStation,
        UpdateStation,
        WeatherReading,
        NewWeatherReading,
        Webhook,
        NewWebhook,
        WebhookCreated,
        OfficialStation,
        Comparison,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "service", description = "Service root and health"),
        (name = "auth", description = "Registration, login and token lifecycle"),
        (name = "users", description = "Account management, owner only"),
        (name = "stations", description = "Weather stations"),
        (name = "weather", description = "Readings and official data"),
        (name = "webhooks", description = "Notifications about new readings"),
    )
)]
pub struct ApiDoc;

/// `GET /openapi.json`
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("Failed to serialize");
        let paths = doc["paths"].as_object().expect("paths object");

        for path in [
            "/",
            "/health",
            "/auth/register",
            "/auth/login",
            "/auth/refresh",
            "/auth/logout",
            "/users/{id}",
            "/stations",
            "/stations/{id}",
            "/weather/stations/{id}",
            "/weather/stations/{id}/current",
            "/weather/stations/{id}/compare",
            "/weather/official/stations",
            "/weather/{id}",
            "/webhooks",
            "/webhooks/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(paths["/stations/{id}"].get("delete").is_some());
        assert!(paths["/weather/stations/{id}"].get("post").is_some());
    }

    #[test]
    fn test_protected_operations_require_bearer() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("Failed to serialize");

        assert_eq!(
            doc["components"]["securitySchemes"]["bearer_auth"]["scheme"],
            "bearer"
        );
        let logout = &doc["paths"]["/auth/logout"]["post"];
        assert!(logout["security"][0].get("bearer_auth").is_some());
        let login = &doc["paths"]["/auth/login"]["post"];
        assert!(login.get("security").is_none());
    }

    #[test]
    fn test_schemas_describe_bodies() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("Failed to serialize");
        let schemas = &doc["components"]["schemas"];

        for name in ["ErrorResponse", "TokenPair", "Station", "WebhookCreated", "Comparison"] {
            assert!(schemas.get(name).is_some(), "missing schema {}", name);
        }
        let reading = &schemas["WeatherReading"]["properties"];
        assert!(reading.get("temperature").is_some());
        assert!(reading.get("recorded_at").is_some());
    }
}
