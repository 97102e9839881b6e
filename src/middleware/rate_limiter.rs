//! Rate limiting for the unauthenticated credential endpoints
//! (login and password reset).

use actix_governor::governor::clock::QuantaInstant;
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

/// Seconds to replenish one request.
const REPLENISH_SECONDS: u64 = 6;
const BURST_SIZE: u32 = 5;

pub type AuthRateLimiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Per-IP limiter: a burst of 5, then one request every 6 seconds.
///
/// ```ignore
/// let config = create_auth_rate_limiter_config();
/// web::resource("/login").wrap(Governor::new(&config))
/// ```
pub fn create_auth_rate_limiter_config() -> AuthRateLimiter {
    GovernorConfigBuilder::default()
        .seconds_per_request(REPLENISH_SECONDS)
        .burst_size(BURST_SIZE)
        .finish()
        .expect("rate limiter burst size and period must be non-zero")
}
