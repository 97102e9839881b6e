//! Authentication request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::validate_password_strength;

/// Request payload for user login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rep@example.com")]
    pub email: String,
    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Request payload for starting a password reset
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rep@example.com")]
    pub email: String,
}

/// Request payload for checking a reset token
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Request payload for completing a password reset
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetConfirmRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// New password (minimum 8 characters with uppercase, lowercase, digit, and special character)
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "NewSecurePass456!")]
    pub password: String,
}
