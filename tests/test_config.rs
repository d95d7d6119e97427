use njordbreeze_api::config::{Config, ConfigError, Environment, DEFAULT_SMHI_BASE_URL};
use std::env;
use std::sync::Mutex;

// Use a mutex to serialize tests that modify environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

const OPTIONAL_VARS: &[&str] = &[
    "JWT_ACCESS_TOKEN_EXPIRY_SECS",
    "JWT_REFRESH_TOKEN_EXPIRY_SECS",
    "HOST",
    "PORT",
    "APP_ENV",
    "SMHI_BASE_URL",
    "BLACKLIST_SWEEP_INTERVAL_SECS",
    "WEBHOOK_TIMEOUT_SECS",
];

fn setup_required_env() {
    env::set_var("NJORD_TEST_MODE", "1");
    env::set_var("DATABASE_URL", "postgres://localhost/test");
    env::set_var("JWT_PRIVATE_KEY", "test_private_pem");
    env::set_var("JWT_PUBLIC_KEY", "test_public_pem");
}

fn cleanup_env() {
    env::remove_var("NJORD_TEST_MODE");
    env::remove_var("DATABASE_URL");
    env::remove_var("JWT_PRIVATE_KEY");
    env::remove_var("JWT_PUBLIC_KEY");
    for var in OPTIONAL_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_required() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();

    let config = Config::from_env().expect("Failed to load config");

    assert_eq!(config.database_url, "postgres://localhost/test");
    assert_eq!(config.jwt_private_key, "test_private_pem");
    assert_eq!(config.jwt_public_key, "test_public_pem");
    assert_eq!(config.jwt_access_token_expiry_secs, 900); // Default
    assert_eq!(config.jwt_refresh_token_expiry_secs, 604800); // Default
    assert_eq!(config.host, "0.0.0.0"); // Default
    assert_eq!(config.port, 8080); // Default
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.smhi_base_url, DEFAULT_SMHI_BASE_URL);
    assert_eq!(config.blacklist_sweep_interval_secs, 300);
    assert_eq!(config.webhook_timeout_secs, 5);

    cleanup_env();
}

#[test]
fn test_config_from_env_with_custom_values() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();

    env::set_var("JWT_ACCESS_TOKEN_EXPIRY_SECS", "1800");
    env::set_var("JWT_REFRESH_TOKEN_EXPIRY_SECS", "86400");
    env::set_var("HOST", "127.0.0.1");
    env::set_var("PORT", "3000");
    env::set_var("APP_ENV", "development");
    env::set_var("SMHI_BASE_URL", "http://localhost:9000/smhi/");
    env::set_var("BLACKLIST_SWEEP_INTERVAL_SECS", "60");
    env::set_var("WEBHOOK_TIMEOUT_SECS", "2");

    let config = Config::from_env().expect("Failed to load config");

    assert_eq!(config.jwt_access_token_expiry_secs, 1800);
    assert_eq!(config.jwt_refresh_token_expiry_secs, 86400);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.environment, Environment::Development);
    assert!(config.environment.is_development());
    assert_eq!(config.smhi_base_url, "http://localhost:9000/smhi");
    assert_eq!(config.blacklist_sweep_interval_secs, 60);
    assert_eq!(config.webhook_timeout_secs, 2);
    assert_eq!(config.server_addr(), "127.0.0.1:3000");

    cleanup_env();
}

#[test]
fn test_config_missing_database_url() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();
    env::remove_var("DATABASE_URL");

    let result = Config::from_env();

    assert!(result.is_err());
    match result.unwrap_err() {
        ConfigError::MissingVar(var) => assert_eq!(var, "DATABASE_URL"),
        other => panic!("Expected MissingVar error, got {:?}", other),
    }

    cleanup_env();
}

#[test]
fn test_config_missing_jwt_keys() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    for missing in ["JWT_PRIVATE_KEY", "JWT_PUBLIC_KEY"] {
        cleanup_env();
        setup_required_env();
        env::remove_var(missing);

        match Config::from_env() {
            Err(ConfigError::MissingVar(var)) => assert_eq!(var, missing),
            other => panic!("Expected MissingVar({}), got {:?}", missing, other),
        }
    }

    cleanup_env();
}

#[test]
fn test_config_invalid_port() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();
    env::set_var("PORT", "not_a_number");

    let result = Config::from_env();

    match result {
        Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "PORT"),
        other => panic!("Expected InvalidValue error, got {:?}", other),
    }

    cleanup_env();
}

#[test]
fn test_config_rejects_non_positive_expiry() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();
    env::set_var("JWT_ACCESS_TOKEN_EXPIRY_SECS", "0");

    match Config::from_env() {
        Err(ConfigError::InvalidValue { var, .. }) => {
            assert_eq!(var, "JWT_ACCESS_TOKEN_EXPIRY_SECS")
        }
        other => panic!("Expected InvalidValue error, got {:?}", other),
    }

    cleanup_env();
}

#[test]
fn test_config_rejects_zero_sweep_interval() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();
    env::set_var("BLACKLIST_SWEEP_INTERVAL_SECS", "0");

    match Config::from_env() {
        Err(ConfigError::InvalidValue { var, .. }) => {
            assert_eq!(var, "BLACKLIST_SWEEP_INTERVAL_SECS")
        }
        other => panic!("Expected InvalidValue error, got {:?}", other),
    }

    cleanup_env();
}

#[test]
fn test_config_rejects_unknown_environment() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env();
    setup_required_env();
    env::set_var("APP_ENV", "staging");

    match Config::from_env() {
        Err(ConfigError::InvalidValue { var, message }) => {
            assert_eq!(var, "APP_ENV");
            assert!(message.contains("staging"));
        }
        other => panic!("Expected InvalidValue error, got {:?}", other),
    }

    cleanup_env();
}

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingVar("TEST_VAR".to_string());
    assert_eq!(err.to_string(), "Missing environment variable: TEST_VAR");
}
