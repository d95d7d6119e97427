use std::env;
use thiserror::Error;

/// Default base URL of the SMHI meteorological observations API.
pub const DEFAULT_SMHI_BASE_URL: &str = "https://opendata-download-metobs.smhi.se/api/version/1.0";

/// Deployment environment. Controls error detail exposure and rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// PEM-encoded RSA private key used to sign tokens
    pub jwt_private_key: String,
    /// PEM-encoded RSA public key used to verify tokens
    pub jwt_public_key: String,
    pub jwt_access_token_expiry_secs: i64,
    pub jwt_refresh_token_expiry_secs: i64,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub smhi_base_url: String,
    pub blacklist_sweep_interval_secs: u64,
    pub webhook_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

fn required(var: &str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::MissingVar(var.to_string()))
}

fn parsed_or<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env::var(var)
        .ok()
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
        .map(|v| v.unwrap_or(default))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Tests control env vars themselves
        if env::var("NJORD_TEST_MODE").is_err() {
            dotenvy::dotenv().ok();
        }

        let database_url = required("DATABASE_URL")?;
        let jwt_private_key = required("JWT_PRIVATE_KEY")?;
        let jwt_public_key = required("JWT_PUBLIC_KEY")?;

        let jwt_access_token_expiry_secs = parsed_or("JWT_ACCESS_TOKEN_EXPIRY_SECS", 900i64)?; // 15 minutes
        let jwt_refresh_token_expiry_secs =
            parsed_or("JWT_REFRESH_TOKEN_EXPIRY_SECS", 7 * 24 * 3600i64)?; // 7 days

        for (var, value) in [
            ("JWT_ACCESS_TOKEN_EXPIRY_SECS", jwt_access_token_expiry_secs),
            ("JWT_REFRESH_TOKEN_EXPIRY_SECS", jwt_refresh_token_expiry_secs),
        ] {
            if value <= 0 {
                return Err(ConfigError::InvalidValue {
                    var: var.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parsed_or("PORT", 8080u16)?;

        let environment = match env::var("APP_ENV").ok().as_deref() {
            None | Some("production") => Environment::Production,
            Some("development") => Environment::Development,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "APP_ENV".to_string(),
                    message: format!("expected 'development' or 'production', got '{}'", other),
                })
            }
        };

        let smhi_base_url = env::var("SMHI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SMHI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let blacklist_sweep_interval_secs = parsed_or("BLACKLIST_SWEEP_INTERVAL_SECS", 300u64)?;
        let webhook_timeout_secs = parsed_or("WEBHOOK_TIMEOUT_SECS", 5u64)?;

        // tokio intervals panic on a zero period
        if blacklist_sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "BLACKLIST_SWEEP_INTERVAL_SECS".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(Config {
            database_url,
            jwt_private_key,
            jwt_public_key,
            jwt_access_token_expiry_secs,
            jwt_refresh_token_expiry_secs,
            host,
            port,
            environment,
            smhi_base_url,
            blacklist_sweep_interval_secs,
            webhook_timeout_secs,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
