//! Password reset handlers. All three routes are public.

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::constants::{
    MSG_PASSWORD_RESET_DONE, MSG_PASSWORD_RESET_REQUESTED, MSG_PASSWORD_RESET_TOKEN_VALID,
};
use crate::errors::ApiError;
use crate::models::{
    ApiResponse, PasswordResetConfirmRequest, PasswordResetRequest, PasswordResetTokenRequest,
};
use crate::services::PasswordResetService;
use crate::validators::validation_errors_to_api_error;

/// Request a password reset e-mail
///
/// Always answers 200 so callers cannot probe which addresses exist.
#[utoipa::path(
    post,
    path = "/api/v1/profiles/password_reset/",
    tag = "Password reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset e-mail sent if the address is known"),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse)
    )
)]
pub async fn request_password_reset(
    resets: web::Data<PasswordResetService>,
    body: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;
    resets.request(&body.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_PASSWORD_RESET_REQUESTED)))
}

/// Check that a reset token is still usable
#[utoipa::path(
    post,
    path = "/api/v1/profiles/password_reset/validate_token/",
    tag = "Password reset",
    request_body = PasswordResetTokenRequest,
    responses(
        (status = 200, description = "Token is valid"),
        (status = 404, description = "Unknown or expired token", body = crate::models::ErrorResponse)
    )
)]
pub async fn validate_reset_token(
    resets: web::Data<PasswordResetService>,
    body: web::Json<PasswordResetTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;
    resets.validate(&body.token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_PASSWORD_RESET_TOKEN_VALID)))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/api/v1/profiles/password_reset/confirm/",
    tag = "Password reset",
    request_body = PasswordResetConfirmRequest,
    responses(
        (status = 200, description = "Password has been reset"),
        (status = 400, description = "Weak password", body = crate::models::ErrorResponse),
        (status = 404, description = "Unknown or expired token", body = crate::models::ErrorResponse)
    )
)]
pub async fn confirm_password_reset(
    resets: web::Data<PasswordResetService>,
    body: web::Json<PasswordResetConfirmRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(validation_errors_to_api_error)?;
    resets.confirm(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_PASSWORD_RESET_DONE)))
}
