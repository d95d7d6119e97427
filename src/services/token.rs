//! Token service for issuing and verifying JWTs.
//!
//! This module provides:
//! - RS256 key loading from PEM text
//! - Access/refresh token pair issuance carrying the user's identity claims
//! - Verification against signature, expiry, token kind and the blacklist

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::User;
use crate::services::blacklist::TokenBlacklist;

/// Seconds past `exp` during which a token still verifies.
///
/// The blacklist keeps entries for the same window, so a purged entry is
/// always one that expiry alone rejects.
pub const EXPIRY_LEEWAY_SECS: i64 = 0;

/// Which role a token plays. Stored in the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims shared by access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject - the user ID as a string
    pub sub: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub typ: TokenKind,
    /// Issued at time as Unix timestamp
    pub iat: i64,
    /// Expiration time as Unix timestamp
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidSubject)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has been revoked")]
    Revoked,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Wrong token type")]
    WrongKind,

    #[error("Invalid user ID in token")]
    InvalidSubject,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
}

/// RSA key pair used to sign and verify tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Environment variables often carry PEM text with escaped newlines.
fn normalize_pem(pem: &str) -> String {
    pem.replace("\\n", "\n")
}

impl TokenKeys {
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, TokenError> {
        let encoding = EncodingKey::from_rsa_pem(normalize_pem(private_pem).as_bytes())
            .map_err(TokenError::InvalidKey)?;
        let decoding = DecodingKey::from_rsa_pem(normalize_pem(public_pem).as_bytes())
            .map_err(TokenError::InvalidKey)?;
        Ok(Self { encoding, decoding })
    }
}

/// Freshly issued credentials returned by login.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(value_type = String, example = "Bearer")]
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Signs a token of `kind` for `user`, valid for `ttl_secs`.
pub fn create_token(
    keys: &TokenKeys,
    user: &User,
    kind: TokenKind,
    ttl_secs: i64,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        typ: kind,
        iat: now,
        exp: now + ttl_secs,
        jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::new(Algorithm::RS256), &claims, &keys.encoding).map_err(TokenError::Signing)
}

pub fn issue_token_pair(
    keys: &TokenKeys,
    user: &User,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access_token: create_token(keys, user, TokenKind::Access, access_ttl_secs)?,
        refresh_token: create_token(keys, user, TokenKind::Refresh, refresh_ttl_secs)?,
        token_type: "Bearer",
        expires_in: access_ttl_secs,
    })
}

/// Checks signature and expiry only. Use [`verify_token`] on request paths.
pub fn decode_token(keys: &TokenKeys, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = EXPIRY_LEEWAY_SECS as u64;
    decode::<Claims>(token, &keys.decoding, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e),
        })
}

/// Full verification: blacklist, signature, expiry and token kind.
///
/// A blacklisted token is rejected before any cryptographic check.
pub fn verify_token(
    keys: &TokenKeys,
    blacklist: &TokenBlacklist,
    token: &str,
    expected: TokenKind,
) -> Result<Claims, TokenError> {
    if blacklist.is_revoked(token) {
        return Err(TokenError::Revoked);
    }
    let claims = decode_token(keys, token)?;
    if claims.typ != expected {
        return Err(TokenError::WrongKind);
    }
    Ok(claims)
}
