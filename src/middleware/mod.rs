//! Middleware and request helpers.

pub mod auth_helpers;
pub mod auth_middleware;
pub mod rate_limiter;
pub mod request_ext;

pub use auth_helpers::*;
pub use auth_middleware::AuthMiddleware;
pub use rate_limiter::{create_auth_rate_limiter_config, AuthRateLimiter};
pub use request_ext::RequestExt;
