//! Rate limiting middleware using actix-governor.
//!
//! Applied to the `/auth` scope to slow down credential guessing. Limits are
//! per peer IP address.

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

use crate::config::Environment;

/// Type alias for the rate limiter configuration.
pub type RateLimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Type alias for the rate limiter.
pub type RateLimiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

fn build(seconds_per_request: u64, burst_size: u32) -> RateLimiterConfig {
    GovernorConfigBuilder::default()
        .per_second(seconds_per_request)
        .burst_size(burst_size)
        .finish()
        // Only fails for a zero period or burst
        .unwrap_or_default()
}

/// 10 requests per minute per IP, bursts up to 10.
///
/// The bucket refills at one token every 6 seconds.
pub fn create_rate_limiter() -> RateLimiter {
    Governor::new(&build(6, 10))
}

/// Relaxed limiter for development: one request per second, bursts up to 60.
pub fn create_dev_rate_limiter() -> RateLimiter {
    Governor::new(&build(1, 60))
}

/// Picks the limiter for `environment`.
///
/// Build one per worker (Governor doesn't implement Clone).
pub fn rate_limiter_for(environment: Environment) -> RateLimiter {
    if environment.is_development() {
        create_dev_rate_limiter()
    } else {
        create_rate_limiter()
    }
}
