//! User profile documents.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User profile document stored in MongoDB.
///
/// Every profile belongs to exactly one tenant. The lock and customer counters
/// are maintained by the contact lifecycle transitions.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub total_contacts_locked: i32,
    #[serde(default)]
    pub total_customers: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<ObjectId>,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<mongodb::bson::DateTime>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// `"First Last <email>"`, used in timeline titles.
    pub fn display_name(&self) -> String {
        format!("{} {} <{}>", self.first_name, self.last_name, self.email)
    }
}

/// Free-text note attached to a user profile.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserNote {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub user_id: ObjectId,
    pub created_on: mongodb::bson::DateTime,
    pub note: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn profile(tenant_id: ObjectId, first: &str, last: &str) -> UserProfile {
        let now = mongodb::bson::DateTime::now();
        UserProfile {
            id: ObjectId::new(),
            tenant_id,
            email: format!("{}@example.com", first.to_lowercase()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            password_hash: String::new(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            total_contacts_locked: 0,
            total_customers: 0,
            role_id: None,
            manager_id: None,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::profile;
    use super::*;

    #[test]
    fn test_names() {
        let user = profile(ObjectId::new(), "Dana", "Reyes");
        assert_eq!(user.full_name(), "Dana Reyes");
        assert_eq!(user.display_name(), "Dana Reyes <dana@example.com>");
    }

    #[test]
    fn test_full_name_without_last_name() {
        let user = profile(ObjectId::new(), "Cher", "");
        assert_eq!(user.full_name(), "Cher");
    }
}
