//! MongoDB collection names.

pub const COLLECTION_TENANTS: &str = "tenants";
pub const COLLECTION_USERS: &str = "user_profiles";
pub const COLLECTION_USER_NOTES: &str = "user_notes";
pub const COLLECTION_ROLES: &str = "roles";
pub const COLLECTION_CONTACTS: &str = "contacts";
pub const COLLECTION_CONTACT_ASSOCIATES: &str = "contact_associates";
pub const COLLECTION_CONTACT_NOTES: &str = "contact_notes";
pub const COLLECTION_CONTACT_TIMELINE: &str = "contact_timeline";
pub const COLLECTION_GOTO_CONFIGS: &str = "gotoconnect_configs";
pub const COLLECTION_GOTO_USERS: &str = "gotoconnect_users";
pub const COLLECTION_PASSWORD_RESET_TOKENS: &str = "password_reset_tokens";
