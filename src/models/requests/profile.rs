//! User profile request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::validate_password_strength;

/// Request payload for creating a user in the caller's tenant (staff only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "rep@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "First name must be between 1 and 255 characters"))]
    #[schema(example = "Dana")]
    pub first_name: String,
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    #[schema(example = "Reyes")]
    #[serde(default)]
    pub last_name: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    #[schema(example = "SecurePass123!")]
    pub confirm_password: String,
}

/// Request payload for updating a profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255, message = "First name must be between 1 and 255 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    pub last_name: Option<String>,
    /// Only honoured for staff callers
    pub is_active: Option<bool>,
}

/// Request payload for changing password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// The caller's current password
    #[validate(length(min = 1, message = "Old password is required"))]
    #[schema(example = "CurrentPass123!")]
    pub old_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "NewSecurePass456!")]
    pub new_password: String,
    #[schema(example = "NewSecurePass456!")]
    pub confirm_password: String,
}

/// Request payload for assigning a role by name
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignRoleRequest {
    #[validate(length(min = 1, message = "Role is required"))]
    #[schema(example = "Sales")]
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignManagerRequest {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub manager_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddNoteRequest {
    #[validate(length(min = 1, message = "Note must not be empty"))]
    #[schema(example = "Follow up after the quarterly review")]
    pub note: String,
}
