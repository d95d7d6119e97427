//! User model and the request bodies that create or modify users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{self, ValidationError, MAX_NAME_LEN};

/// A registered user.
///
/// The passphrase hash never leaves the service: it is skipped on
/// serialization so handlers can return `User` directly.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    /// Unique identifier for the user (UUID v4)
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub passphrase_hash: String,

    pub first_name: String,

    pub last_name: String,

    /// Unique, stored lowercased
    pub email: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a user in memory (for tests and fixtures).
    #[allow(dead_code)]
    pub fn new(
        username: String,
        passphrase_hash: String,
        first_name: String,
        last_name: String,
        email: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            passphrase_hash,
            first_name,
            last_name,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUser {
    pub username: String,
    pub passphrase: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewUser {
    /// Validates every field and returns a normalized copy.
    pub fn validated(&self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            username: validation::username(&self.username)?.to_string(),
            passphrase: validation::passphrase(&self.passphrase)?.to_string(),
            first_name: validation::text("first_name", &self.first_name, MAX_NAME_LEN)?.to_string(),
            last_name: validation::text("last_name", &self.last_name, MAX_NAME_LEN)?.to_string(),
            email: validation::email(&self.email)?,
        })
    }
}

/// Body of `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub passphrase: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUser {
    pub fn validated(&self) -> Result<UpdateUser, ValidationError> {
        Ok(UpdateUser {
            username: self
                .username
                .as_deref()
                .map(validation::username)
                .transpose()?
                .map(str::to_string),
            passphrase: self
                .passphrase
                .as_deref()
                .map(validation::passphrase)
                .transpose()?
                .map(str::to_string),
            first_name: self
                .first_name
                .as_deref()
                .map(|v| validation::text("first_name", v, MAX_NAME_LEN))
                .transpose()?
                .map(str::to_string),
            last_name: self
                .last_name
                .as_deref()
                .map(|v| validation::text("last_name", v, MAX_NAME_LEN))
                .transpose()?
                .map(str::to_string),
            email: self.email.as_deref().map(validation::email).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.passphrase.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
    }
}
