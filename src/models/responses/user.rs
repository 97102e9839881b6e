//! User-related response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{UserNote, UserProfile};

/// User data returned in API responses (without sensitive fields)
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserResponse {
    /// User's unique identifier
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    pub tenant_id: String,
    #[schema(example = "rep@example.com")]
    pub email: String,
    #[schema(example = "Dana")]
    pub first_name: String,
    #[schema(example = "Reyes")]
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    /// Number of prospects currently locked by the user
    pub total_contacts_locked: i32,
    /// Number of contacts the user converted to customers
    pub total_customers: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserProfile> for UserResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id.to_hex(),
            tenant_id: user.tenant_id.to_hex(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            is_staff: user.is_staff,
            total_contacts_locked: user.total_contacts_locked,
            total_customers: user.total_customers,
            role_id: user.role_id.map(|id| id.to_hex()),
            manager_id: user.manager_id.map(|id| id.to_hex()),
            created_at: user.created_at.to_chrono(),
            updated_at: user.updated_at.to_chrono(),
            last_login: user.last_login.map(|dt| dt.to_chrono()),
        }
    }
}

/// Response for successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Whether the request was successful
    pub success: bool,
    /// Response message
    pub message: String,
    /// JWT token for authentication
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// User information
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserNoteResponse {
    pub id: String,
    pub user_id: String,
    pub created_on: DateTime<Utc>,
    pub note: String,
}

impl From<UserNote> for UserNoteResponse {
    fn from(note: UserNote) -> Self {
        Self {
            id: note.id.to_hex(),
            user_id: note.user_id.to_hex(),
            created_on: note.created_on.to_chrono(),
            note: note.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::profile;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_response_hides_password_hash() {
        let mut user = profile(ObjectId::new(), "Dana", "Reyes");
        user.password_hash = "$2b$12$secret".to_string();
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("role_id").is_none());
        assert_eq!(json["first_name"], "Dana");
    }
}
