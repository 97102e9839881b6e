//! JWT Claims model.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::constants::{CODE_INVALID_TOKEN, ERR_INVALID_TOKEN};
use crate::errors::ApiError;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub tenant_id: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, ApiError> {
        parse_claim_id(&self.sub)
    }

    pub fn tenant_object_id(&self) -> Result<ObjectId, ApiError> {
        parse_claim_id(&self.tenant_id)
    }
}

fn parse_claim_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value)
        .map_err(|_| ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_INVALID_TOKEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, tenant_id: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "rep@example.com".to_string(),
            tenant_id: tenant_id.to_string(),
            is_staff: false,
            is_superuser: false,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_ids_parse_from_claims() {
        let user = ObjectId::new();
        let tenant = ObjectId::new();
        let c = claims(&user.to_hex(), &tenant.to_hex());
        assert_eq!(c.user_id().unwrap(), user);
        assert_eq!(c.tenant_object_id().unwrap(), tenant);
    }

    #[test]
    fn test_malformed_claim_ids_are_unauthorized() {
        let c = claims("not-an-id", "also-not");
        assert!(matches!(c.user_id(), Err(ApiError::Unauthorized { .. })));
        assert!(matches!(c.tenant_object_id(), Err(ApiError::Unauthorized { .. })));
    }
}
