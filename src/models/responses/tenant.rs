use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Tenant;

#[derive(Debug, Serialize, ToSchema)]
pub struct TenantResponse {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    pub name: String,
    pub subdomain_prefix: String,
    pub max_prospects_per_user: i32,
    pub prospect_cooldown_days: i32,
    pub lock_expiry_days: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id.to_hex(),
            name: tenant.name,
            subdomain_prefix: tenant.subdomain_prefix,
            max_prospects_per_user: tenant.max_prospects_per_user,
            prospect_cooldown_days: tenant.prospect_cooldown_days,
            lock_expiry_days: tenant.lock_expiry_days,
            created_at: tenant.created_at.to_chrono(),
        }
    }
}
