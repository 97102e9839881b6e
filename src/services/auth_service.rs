//! Authentication service for login, token generation, and password utilities.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};
use mongodb::bson::oid::ObjectId;
use mongodb::Database;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::CONFIG;
use crate::constants::{
    CODE_ACCOUNT_DEACTIVATED, CODE_INVALID_CREDENTIALS, CODE_INVALID_TOKEN,
    ERR_ACCOUNT_DEACTIVATED, ERR_GOTO_STATE_INVALID, ERR_INVALID_CREDENTIALS,
};
use crate::errors::ApiError;
use crate::models::{Claims, LoginRequest, UserProfile};
use crate::repositories::UserRepository;
use crate::utils::mask_email;

/// Lifetime of the OAuth `state` handed to GoToConnect.
const OAUTH_STATE_MINUTES: i64 = 10;
const OAUTH_STATE_PURPOSE: &str = "gotoconnect";

/// Claims of the signed `state` parameter used in the GoToConnect redirect.
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthState {
    pub sub: String,
    pub tenant_id: String,
    pub purpose: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthService {
    repository: Arc<UserRepository>,
}

impl AuthService {
    pub fn new(db: &Database) -> Self {
        Self {
            repository: Arc::new(UserRepository::new(db)),
        }
    }

    /// Authenticate a user and return a JWT token.
    pub async fn login(&self, req: LoginRequest) -> Result<(UserProfile, String), ApiError> {
        let invalid = || ApiError::unauthorized(CODE_INVALID_CREDENTIALS, ERR_INVALID_CREDENTIALS);

        let user = self.repository.find_by_email(&req.email).await?.ok_or_else(|| {
            warn!("Login attempt for unknown email {}", mask_email(&req.email));
            invalid()
        })?;

        if !verify_password(&req.password, &user.password_hash)? {
            warn!("Wrong password for {}", mask_email(&user.email));
            return Err(invalid());
        }

        if !user.is_active {
            return Err(ApiError::unauthorized(
                CODE_ACCOUNT_DEACTIVATED,
                ERR_ACCOUNT_DEACTIVATED,
            ));
        }

        self.repository.update_last_login(user.id).await?;

        let token = Self::generate_token(
            &user.id.to_hex(),
            &user.email,
            &user.tenant_id.to_hex(),
            user.is_staff,
            user.is_superuser,
        )?;
        info!("User {} logged in", mask_email(&user.email));

        Ok((user, token))
    }

    /// Issue an access token for the given identity.
    pub fn generate_token(
        user_id: &str,
        email: &str,
        tenant_id: &str,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::hours(CONFIG.jwt_expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            tenant_id: tenant_id.to_string(),
            is_staff,
            is_superuser,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        debug!("Generated token for user {}", user_id);

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        )?)
    }

    /// Short-lived signed `state` identifying the user who started the OAuth flow.
    pub fn generate_oauth_state(user_id: ObjectId, tenant_id: ObjectId) -> Result<String, ApiError> {
        let now = Utc::now();
        let state = OAuthState {
            sub: user_id.to_hex(),
            tenant_id: tenant_id.to_hex(),
            purpose: OAUTH_STATE_PURPOSE.to_string(),
            exp: (now + Duration::minutes(OAUTH_STATE_MINUTES)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok(encode(
            &Header::default(),
            &state,
            &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        )?)
    }

    /// Verify a `state` value and return `(user_id, tenant_id)`.
    pub fn verify_oauth_state(state: &str) -> Result<(ObjectId, ObjectId), ApiError> {
        let invalid = || ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_GOTO_STATE_INVALID);
        let data = decode::<OAuthState>(
            state,
            &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| invalid())?;
        if data.claims.purpose != OAUTH_STATE_PURPOSE {
            return Err(invalid());
        }
        let user_id = ObjectId::parse_str(&data.claims.sub).map_err(|_| invalid())?;
        let tenant_id = ObjectId::parse_str(&data.claims.tenant_id).map_err(|_| invalid())?;
        Ok((user_id, tenant_id))
    }
}

/// Hash a password using bcrypt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    Ok(verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_carries_tenant() {
        let user = ObjectId::new();
        let tenant = ObjectId::new();
        let token =
            AuthService::generate_token(&user.to_hex(), "dana@example.com", &tenant.to_hex(), true, false)
                .unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.user_id().unwrap(), user);
        assert_eq!(data.claims.tenant_object_id().unwrap(), tenant);
        assert!(data.claims.is_staff);
        assert!(!data.claims.is_superuser);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_oauth_state_round_trip() {
        let user = ObjectId::new();
        let tenant = ObjectId::new();
        let state = AuthService::generate_oauth_state(user, tenant).unwrap();
        assert_eq!(AuthService::verify_oauth_state(&state).unwrap(), (user, tenant));
    }

    #[test]
    fn test_access_token_is_not_a_valid_state() {
        let token = AuthService::generate_token(
            &ObjectId::new().to_hex(),
            "dana@example.com",
            &ObjectId::new().to_hex(),
            false,
            false,
        )
        .unwrap();
        assert!(AuthService::verify_oauth_state(&token).is_err());
        assert!(AuthService::verify_oauth_state("garbage").is_err());
    }

    #[test]
    fn test_password_hashing() {
        let hashed = bcrypt::hash("Secret#123", 4).unwrap();
        assert!(verify_password("Secret#123", &hashed).unwrap());
        assert!(!verify_password("Secret#124", &hashed).unwrap());
    }
}
