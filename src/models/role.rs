//! Tenant-scoped roles carrying permission codenames.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ADMIN_ROLE_NAME;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_at: mongodb::bson::DateTime,
}

impl Role {
    pub fn has_permission(&self, codename: &str) -> bool {
        self.permissions.iter().any(|p| p == codename)
    }

    pub fn is_admin_role(&self) -> bool {
        self.name == DEFAULT_ADMIN_ROLE_NAME
    }
}
