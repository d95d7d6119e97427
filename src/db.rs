//! Database connection pool and migration utilities.
//!
//! Provides functions for creating a PostgreSQL connection pool
//! and running the embedded migrations in `./migrations`.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Maximum pooled connections.
pub const MAX_CONNECTIONS: u32 = 5;
/// How long to wait for a free connection before failing.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// Creates a PostgreSQL connection pool with configured settings.
///
/// # Arguments
/// * `database_url` - The PostgreSQL connection string
///
/// # Returns
/// * `Ok(PgPool)` - A configured connection pool
/// * `Err(sqlx::Error)` - If the pool cannot be created
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Runs all pending database migrations.
///
/// # Arguments
/// * `pool` - Reference to the PostgreSQL connection pool
///
/// # Returns
/// * `Ok(())` - If all migrations run successfully
/// * `Err(sqlx::migrate::MigrateError)` - If any migration fails
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_values() {
        assert!(MAX_CONNECTIONS > 0);
        assert!(MAX_CONNECTIONS <= 20); // Reasonable upper bound
        assert!(ACQUIRE_TIMEOUT.as_secs() >= 1);
        assert!(ACQUIRE_TIMEOUT.as_secs() <= 30);
    }
}
