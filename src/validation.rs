//! Field validation shared by the request models.

use reqwest::Url;
use thiserror::Error;

/// Longest accepted value for free-text name fields.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted station description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Passphrases shorter than this are rejected at registration and update.
pub const MIN_PASSPHRASE_LEN: usize = 10;
/// Upper bound keeps argon2 hashing cost bounded.
pub const MAX_PASSPHRASE_LEN: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("passphrase must be between 10 and 256 characters")]
    PassphraseLength,

    #[error("email address is not valid")]
    Email,

    #[error("username may only contain letters, digits, '-', '_' and '.'")]
    Username,

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    #[error("url must be an absolute http or https URL")]
    Url,
}

/// Checks a required text field and returns it trimmed.
pub fn text<'a>(field: &'static str, value: &'a str, max: usize) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed)
}

pub fn username(value: &str) -> Result<&str, ValidationError> {
    let trimmed = text("username", value, MAX_NAME_LEN)?;
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ValidationError::Username);
    }
    Ok(trimmed)
}

pub fn passphrase(value: &str) -> Result<&str, ValidationError> {
    let len = value.chars().count();
    if !(MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&len) {
        return Err(ValidationError::PassphraseLength);
    }
    Ok(value)
}

/// Structural check only: one `@`, non-empty local part, dotted domain.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let (local, domain) = trimmed.split_once('@').ok_or(ValidationError::Email)?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok || trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::Email);
    }
    Ok(trimmed.to_lowercase())
}

pub fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(value)
}

pub fn latitude(value: f64) -> Result<f64, ValidationError> {
    in_range("latitude", value, -90.0, 90.0)
}

pub fn longitude(value: f64) -> Result<f64, ValidationError> {
    in_range("longitude", value, -180.0, 180.0)
}

/// Accepts absolute `http`/`https` URLs that name a host.
pub fn webhook_url(value: &str) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::Url);
    }
    let url = Url::parse(trimmed).map_err(|_| ValidationError::Url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::Url);
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed),
        _ => Err(ValidationError::Url),
    }
}
