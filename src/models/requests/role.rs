//! Role request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::validate_not_blank;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[validate(
        length(min = 1, max = 100, message = "Role name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Dispatch")]
    pub name: String,
    /// Comma separated permission codenames
    #[schema(example = "view_contact,add_contactnote")]
    #[serde(default)]
    pub permissions: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// Comma separated permission codenames, replacing the current set
    #[schema(example = "view_contact,add_contactnote,view_contacttimeline")]
    pub permissions: String,
}
