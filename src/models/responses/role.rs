use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: String,
    #[schema(example = "Sales")]
    pub name: String,
    #[schema(example = json!(["view_contact"]))]
    pub permissions: Vec<String>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.to_hex(),
            name: role.name,
            permissions: role.permissions,
        }
    }
}
