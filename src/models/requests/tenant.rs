//! Tenant administration request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::{validate_not_blank, validate_subdomain_prefix};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Blue Ridge Logistics")]
    pub name: String,
    #[validate(
        length(min = 1, max = 100, message = "Subdomain prefix must be between 1 and 100 characters"),
        custom(function = "validate_subdomain_prefix")
    )]
    #[schema(example = "blueridge")]
    pub subdomain_prefix: String,
    #[validate(range(min = 1, max = 10000, message = "Max prospects per user must be between 1 and 10000"))]
    #[schema(example = 10)]
    pub max_prospects_per_user: Option<i32>,
    #[validate(range(min = 0, max = 365, message = "Prospect cooldown days must be between 0 and 365"))]
    #[schema(example = 3)]
    pub prospect_cooldown_days: Option<i32>,
    #[validate(range(min = 1, max = 3650, message = "Lock expiry days must be between 1 and 3650"))]
    #[schema(example = 30)]
    pub lock_expiry_days: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTenantRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 10000, message = "Max prospects per user must be between 1 and 10000"))]
    pub max_prospects_per_user: Option<i32>,
    #[validate(range(min = 0, max = 365, message = "Prospect cooldown days must be between 0 and 365"))]
    pub prospect_cooldown_days: Option<i32>,
    #[validate(range(min = 1, max = 3650, message = "Lock expiry days must be between 1 and 3650"))]
    pub lock_expiry_days: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update() -> UpdateTenantRequest {
        UpdateTenantRequest {
            name: None,
            max_prospects_per_user: None,
            prospect_cooldown_days: None,
            lock_expiry_days: None,
        }
    }

    #[test]
    fn test_day_windows_are_bounded() {
        let mut req = update();
        req.lock_expiry_days = Some(3650);
        req.prospect_cooldown_days = Some(365);
        assert!(req.validate().is_ok());

        req.lock_expiry_days = Some(i32::MAX);
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("lock_expiry_days"));

        let mut req = update();
        req.prospect_cooldown_days = Some(366);
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("prospect_cooldown_days"));
    }

    #[test]
    fn test_create_rejects_out_of_range_expiry() {
        let req = CreateTenantRequest {
            name: "Blue Ridge Logistics".to_string(),
            subdomain_prefix: "blueridge".to_string(),
            max_prospects_per_user: Some(10),
            prospect_cooldown_days: Some(3),
            lock_expiry_days: Some(1_000_000),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_tenant_name_is_rejected() {
        let mut req = update();
        req.name = Some("   ".to_string());
        assert!(req.validate().is_err());
    }
}
