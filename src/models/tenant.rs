//! Tenant document: an isolated customer organization.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PROSPECTS_PER_USER: i32 = 10;
pub const DEFAULT_PROSPECT_COOLDOWN_DAYS: i32 = 3;
pub const DEFAULT_LOCK_EXPIRY_DAYS: i32 = 30;

fn default_lock_expiry_days() -> i32 {
    DEFAULT_LOCK_EXPIRY_DAYS
}

/// Tenant document stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tenant {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub subdomain_prefix: String,
    /// Max number of prospects a user can lock at a single time
    pub max_prospects_per_user: i32,
    /// How long before a user can re-lock a prospect they released
    pub prospect_cooldown_days: i32,
    /// Locks older than this are released by the weekly job
    #[serde(default = "default_lock_expiry_days")]
    pub lock_expiry_days: i32,
    pub created_at: mongodb::bson::DateTime,
}
