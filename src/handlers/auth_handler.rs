//! Authentication handlers for login and logout.

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::constants::{MSG_LOGIN_SUCCESS, MSG_LOGOUT_SUCCESS};
use crate::errors::ApiError;
use crate::middleware::{require_auth, RequestExt};
use crate::models::{ApiResponse, AuthResponse, LoginRequest};
use crate::services::{AuthService, TokenBlacklist};
use crate::validators::validation_errors_to_api_error;

/// Authenticate a user and get a JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::models::ErrorResponse),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;

    let (user, token) = auth_service.login(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: MSG_LOGIN_SUCCESS.to_string(),
        token,
        user: user.into(),
    }))
}

/// Logout the current user
///
/// The bearer token is revoked server-side until its natural expiration.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "Invalid or missing token", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    req: HttpRequest,
    token_blacklist: web::Data<TokenBlacklist>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;

    if let Some(token) = req.get_raw_token() {
        token_blacklist.revoke(&token, claims.exp).await;
        info!("User {} logged out successfully", claims.sub);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_LOGOUT_SUCCESS)))
}
