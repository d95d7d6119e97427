//! User service for database operations.
//!
//! This module provides functions for managing users in the database:
//! lookups, registration, partial updates, deletion and passphrase
//! authentication. Inputs are expected to be validated already.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{NewUser, UpdateUser, User};
use crate::services::passphrase::{hash_passphrase, verify_passphrase_or_dummy};

const USER_COLUMNS: &str =
    "id, username, passphrase_hash, first_name, last_name, email, created_at, updated_at";

/// Finds a user by their UUID.
///
/// # Returns
///
/// A Result containing an Option<User> - Some if found, None if not
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = $1",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Creates a user, hashing the passphrase.
///
/// # Errors
///
/// A taken username or email surfaces as `AppError::Conflict`.
pub async fn create(pool: &PgPool, new_user: &NewUser) -> AppResult<User> {
    let passphrase_hash = hash_passphrase(&new_user.passphrase)
        .map_err(|e| AppError::Internal(format!("Failed to hash passphrase: {}", e)))?;

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (username, passphrase_hash, first_name, last_name, email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(&new_user.username)
    .bind(&passphrase_hash)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.email)
    .fetch_one(pool)
    .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Applies a partial update. Absent fields keep their stored value; a new
/// passphrase is rehashed.
///
/// Returns `None` if the user no longer exists.
pub async fn update(pool: &PgPool, id: Uuid, changes: &UpdateUser) -> AppResult<Option<User>> {
    let passphrase_hash = changes
        .passphrase
        .as_deref()
        .map(hash_passphrase)
        .transpose()
        .map_err(|e| AppError::Internal(format!("Failed to hash passphrase: {}", e)))?;

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET
            username = COALESCE($2, username),
            passphrase_hash = COALESCE($3, passphrase_hash),
            first_name = COALESCE($4, first_name),
            last_name = COALESCE($5, last_name),
            email = COALESCE($6, email),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(id)
    .bind(&changes.username)
    .bind(&passphrase_hash)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Deletes a user. Their stations, readings and webhooks go with them.
///
/// Returns the deleted user, or `None` if there was nothing to delete.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "DELETE FROM users WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Checks a username/passphrase pair.
///
/// Unknown usernames and wrong passphrases both yield `Ok(None)` so callers
/// cannot tell them apart.
pub async fn authenticate(
    pool: &PgPool,
    username: &str,
    passphrase: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = find_by_username(pool, username.trim()).await?;
    let hash = user.as_ref().map(|u| u.passphrase_hash.as_str());
    if verify_passphrase_or_dummy(passphrase, hash) {
        Ok(user)
    } else {
        Ok(None)
    }
}
