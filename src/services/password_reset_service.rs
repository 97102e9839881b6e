//! Password reset by e-mailed token.

use chrono::{Duration, Utc};
use log::{debug, error, info};
use mongodb::bson::oid::ObjectId;
use mongodb::Database;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::constants::{CODE_RESET_TOKEN_INVALID, ERR_RESET_TOKEN_INVALID};
use crate::errors::ApiError;
use crate::models::{PasswordResetConfirmRequest, PasswordResetToken, UserProfile};
use crate::repositories::{PasswordResetRepository, UserRepository};
use crate::services::auth_service::hash_password;
use crate::services::Mailer;
use crate::utils::mask_email;

pub struct PasswordResetService {
    repository: Arc<PasswordResetRepository>,
    users: Arc<UserRepository>,
    mailer: Arc<Mailer>,
}

fn new_token(user: &UserProfile, now: chrono::DateTime<Utc>) -> PasswordResetToken {
    PasswordResetToken {
        id: ObjectId::new(),
        tenant_id: user.tenant_id,
        user_id: user.id,
        key: Uuid::new_v4().simple().to_string(),
        created_at: mongodb::bson::DateTime::from_chrono(now),
        expires_at: mongodb::bson::DateTime::from_chrono(
            now + Duration::hours(CONFIG.password_reset_expiry_hours),
        ),
    }
}

fn invalid_token() -> ApiError {
    ApiError::not_found(CODE_RESET_TOKEN_INVALID, ERR_RESET_TOKEN_INVALID)
}

impl PasswordResetService {
    pub fn new(db: &Database, mailer: Arc<Mailer>) -> Self {
        Self {
            repository: Arc::new(PasswordResetRepository::new(db)),
            users: Arc::new(UserRepository::new(db)),
            mailer,
        }
    }

    /// Issue and send a token when `email` belongs to an active user.
    /// Never reveals whether the address is known.
    pub async fn request(&self, email: &str) -> Result<(), ApiError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) if user.is_active => user,
            _ => {
                debug!("Password reset requested for unknown or inactive {}", mask_email(email));
                return Ok(());
            }
        };

        let token = new_token(&user, Utc::now());
        self.repository.insert(&token).await?;
        if let Err(err) = self.mailer.send_password_reset(&user.email, &token.key).await {
            error!("Could not send password reset to {}: {}", mask_email(&user.email), err);
        }
        Ok(())
    }

    pub async fn validate(&self, key: &str) -> Result<PasswordResetToken, ApiError> {
        let token = self
            .repository
            .find_by_key(key.trim())
            .await?
            .ok_or_else(invalid_token)?;
        if token.is_expired(mongodb::bson::DateTime::now()) {
            return Err(invalid_token());
        }
        Ok(token)
    }

    /// Set the new password and drop every outstanding token of that user.
    pub async fn confirm(&self, req: PasswordResetConfirmRequest) -> Result<(), ApiError> {
        let token = self.validate(&req.token).await?;
        let user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or_else(invalid_token)?;

        self.users
            .update_password(user.id, &hash_password(&req.password)?)
            .await?;
        let consumed = self.repository.delete_for_user(user.id).await?;
        info!(
            "Password reset for {} ({} tokens consumed)",
            mask_email(&user.email),
            consumed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::profile;

    #[test]
    fn test_new_token_expiry() {
        let user = profile(ObjectId::new(), "Dana", "Reyes");
        let now = Utc::now();
        let token = new_token(&user, now);
        assert_eq!(token.user_id, user.id);
        assert_eq!(token.tenant_id, user.tenant_id);
        assert_eq!(token.key.len(), 32);

        let lifetime = token.expires_at.to_chrono() - token.created_at.to_chrono();
        assert_eq!(lifetime, Duration::hours(CONFIG.password_reset_expiry_hours));
        assert!(!token.is_expired(token.created_at));
    }

    #[test]
    fn test_tokens_are_unique() {
        let user = profile(ObjectId::new(), "Dana", "Reyes");
        let now = Utc::now();
        assert_ne!(new_token(&user, now).key, new_token(&user, now).key);
    }
}
