//! Ownership checks for user-owned resources.
//!
//! Handlers call [`require_owner`] after the [`AuthenticatedUser`] extractor
//! has run, so failures surface in a fixed order:
//! 401 (no valid token), 400 (malformed id), 404 (no such resource),
//! 403 (someone else's resource).

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::services::{station, user, weather, webhook};

/// Kinds of resource whose access is restricted to an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedResource {
    /// A user owns their own account
    User,
    Station,
    /// Owned by the owner of the reading's station
    WeatherReading,
    Webhook,
}

impl OwnedResource {
    fn label(self) -> &'static str {
        match self {
            OwnedResource::User => "User",
            OwnedResource::Station => "Station",
            OwnedResource::WeatherReading => "Weather reading",
            OwnedResource::Webhook => "Webhook",
        }
    }

    async fn owner_of(self, pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        match self {
            OwnedResource::User => Ok(user::find_by_id(pool, id).await?.map(|u| u.id)),
            OwnedResource::Station => station::owner_of(pool, id).await,
            OwnedResource::WeatherReading => weather::owner_of(pool, id).await,
            OwnedResource::Webhook => webhook::owner_of(pool, id).await,
        }
    }
}

/// Parses a path id. Malformed ids are a client error, not a missing resource.
pub fn parse_resource_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
}

/// Compares the authenticated subject with a resource owner.
///
/// `None` means the resource does not exist.
pub fn ensure_owner(resource: OwnedResource, subject: Uuid, owner: Option<Uuid>) -> AppResult<()> {
    match owner {
        None => Err(AppError::NotFound(format!("{} not found", resource.label()))),
        Some(owner) if owner == subject => Ok(()),
        Some(_) => Err(AppError::Forbidden(format!(
            "{} belongs to another user",
            resource.label()
        ))),
    }
}

/// Resolves the owner of `raw_id` and checks it against `user`.
///
/// Returns the parsed id on success.
pub async fn require_owner(
    pool: &PgPool,
    user: &AuthenticatedUser,
    resource: OwnedResource,
    raw_id: &str,
) -> AppResult<Uuid> {
    let id = parse_resource_id(raw_id)?;
    let owner = resource.owner_of(pool, id).await?;
    if let Err(e) = ensure_owner(resource, user.user_id, owner) {
        tracing::debug!(
            user_id = %user.user_id,
            resource = resource.label(),
            %id,
            "Ownership check failed: {}", e
        );
        return Err(e);
    }
    Ok(id)
}
