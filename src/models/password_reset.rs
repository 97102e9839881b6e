use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Single-use password reset token.
///
/// Expired tokens are removed by a TTL index on `expires_at`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PasswordResetToken {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tenant_id: ObjectId,
    pub user_id: ObjectId,
    pub key: String,
    pub created_at: mongodb::bson::DateTime,
    pub expires_at: mongodb::bson::DateTime,
}

impl PasswordResetToken {
    pub fn is_expired(&self, now: mongodb::bson::DateTime) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expired() {
        let now = mongodb::bson::DateTime::now();
        let later = mongodb::bson::DateTime::from_millis(now.timestamp_millis() + 60_000);
        let token = PasswordResetToken {
            id: ObjectId::new(),
            tenant_id: ObjectId::new(),
            user_id: ObjectId::new(),
            key: "abc".to_string(),
            created_at: now,
            expires_at: later,
        };
        assert!(!token.is_expired(now));
        assert!(token.is_expired(later));
    }
}
