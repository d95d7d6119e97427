//! njordbreeze-api - Main application entry point
//!
//! Loads configuration, prepares the database, token keys and clients, starts
//! the blacklist sweeper and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use njordbreeze_api::config::Config;
use njordbreeze_api::db::{create_pool, run_migrations};
use njordbreeze_api::error::expose_internal_errors;
use njordbreeze_api::handlers::auth::AppState;
use njordbreeze_api::middleware::rate_limiter_for;
use njordbreeze_api::routes;
use njordbreeze_api::services::blacklist::{run_sweeper, TokenBlacklist};
use njordbreeze_api::services::{SmhiClient, TokenKeys};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "njordbreeze_api=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Loading configuration...");

    let config = Config::from_env().expect("Failed to load configuration");
    let server_addr = config.server_addr();
    expose_internal_errors(config.environment.is_development());

    let keys = TokenKeys::from_pem(&config.jwt_private_key, &config.jwt_public_key)
        .expect("Failed to load JWT keys");

    // Create database connection pool
    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Database connection pool created");

    // Run database migrations
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Shared by the SMHI client and webhook delivery
    let http_client = reqwest::Client::builder()
        .user_agent("njordbreeze-api")
        .build()
        .expect("Failed to create HTTP client");

    let blacklist = Arc::new(TokenBlacklist::new());
    tokio::spawn(run_sweeper(
        blacklist.clone(),
        Duration::from_secs(config.blacklist_sweep_interval_secs),
    ));

    let environment = config.environment;
    let app_state = web::Data::new(AppState {
        pool,
        smhi: SmhiClient::new(http_client.clone(), config.smhi_base_url.clone()),
        config,
        http_client,
        keys: Arc::new(keys),
        blacklist,
    });

    tracing::info!(?environment, "Starting server at http://{}", server_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            // Request logging
            .wrap(Logger::default())
            // Distributed tracing
            .wrap(tracing_actix_web::TracingLogger::default())
            // Rate limiter per worker (Governor doesn't implement Clone)
            .service(routes::auth_scope().wrap(rate_limiter_for(environment)))
            .configure(routes::configure)
    })
    .bind(&server_addr)?
    .run()
    .await
}
