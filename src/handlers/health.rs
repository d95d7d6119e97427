//! Service root and health check endpoints.

use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response structure.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// The status of the service
    pub status: String,
}

/// Navigation links to the top-level resources.
#[derive(Debug, Serialize, ToSchema)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    #[schema(value_type = String)]
    pub auth: &'static str,
    #[schema(value_type = String)]
    pub users: &'static str,
    #[schema(value_type = String)]
    pub stations: &'static str,
    #[schema(value_type = String)]
    pub weather: &'static str,
    #[schema(value_type = String)]
    pub webhooks: &'static str,
    /// Interactive API documentation
    #[schema(value_type = String)]
    pub docs: &'static str,
}

impl Links {
    pub fn for_path(path: &str) -> Self {
        Links {
            self_link: path.to_string(),
            auth: "/auth",
            users: "/users",
            stations: "/stations",
            weather: "/weather",
            webhooks: "/webhooks",
            docs: "/docs",
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// `GET /` - welcome message with links to every resource.
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses((status = 200, description = "Welcome message and links", body = IndexResponse))
)]
pub async fn index(req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(IndexResponse {
        message: "Welcome to the njordbreeze weather station API",
        links: Links::for_path(req.path()),
    })
}

/// Health check endpoint that returns a JSON response indicating the service is healthy.
///
/// # Example
///
/// ```ignore
/// GET /health
/// Response: {"status": "healthy"}
/// ```
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
        };
        let json = serde_json::to_string(&response).expect("Failed to serialize");
        assert!(json.contains("\"status\":\"healthy\""));
    }

    #[test]
    fn test_index_links_serialization() {
        let response = IndexResponse {
            message: "hi",
            links: Links::for_path("/"),
        };
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(json["_links"]["self"], "/");
        assert_eq!(json["_links"]["stations"], "/stations");
        assert_eq!(json["_links"]["webhooks"], "/webhooks");
        assert_eq!(json["_links"]["docs"], "/docs");
    }
}
