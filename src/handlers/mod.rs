//! HTTP request handlers organized by domain.

pub mod auth_handler;
pub mod contact_handler;
pub mod gotoconnect_handler;
pub mod password_reset_handler;
pub mod profile_handler;
pub mod role_handler;
pub mod tenant_handler;

pub use auth_handler::*;
pub use contact_handler::*;
pub use gotoconnect_handler::*;
pub use password_reset_handler::*;
pub use profile_handler::*;
pub use role_handler::*;
pub use tenant_handler::*;

use actix_web::HttpRequest;

use crate::errors::ApiError;
use crate::middleware::require_auth;
use crate::models::CurrentUser;
use crate::services::UserService;

/// Resolve the bearer claims into the caller's profile and role.
pub(crate) async fn current_user(
    req: &HttpRequest,
    users: &UserService,
) -> Result<CurrentUser, ApiError> {
    let claims = require_auth(req)?;
    users.current_user(&claims).await
}
