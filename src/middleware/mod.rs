//! Middleware for the njordbreeze API.
//!
//! This module contains:
//! - `auth` - JWT authentication (AuthenticatedUser extractor)
//! - `ownership` - Owner checks for users, stations, readings and webhooks
//! - `rate_limit` - Rate limiting middleware using Governor

pub mod auth;
pub mod ownership;
pub mod rate_limit;

// Re-export commonly used types
pub use auth::{AuthError, AuthenticatedUser};
pub use ownership::{ensure_owner, parse_resource_id, require_owner, OwnedResource};
pub use rate_limit::{
    create_dev_rate_limiter, create_rate_limiter, rate_limiter_for, RateLimiter,
    RateLimiterConfig,
};
