//! Error code constants for API responses.
//!
//! These codes provide a machine-readable identifier for each error type,
//! making it easier for API clients to handle errors programmatically.

// Validation errors
pub const CODE_VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const CODE_INVALID_ID: &str = "INVALID_ID";

// Authentication errors
pub const CODE_AUTH_REQUIRED: &str = "AUTH_REQUIRED";
pub const CODE_INVALID_TOKEN: &str = "INVALID_TOKEN";
pub const CODE_TOKEN_REVOKED: &str = "TOKEN_REVOKED";
pub const CODE_INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
pub const CODE_ACCOUNT_DEACTIVATED: &str = "ACCOUNT_DEACTIVATED";

// Authorization errors
pub const CODE_FORBIDDEN: &str = "FORBIDDEN";
pub const CODE_STAFF_REQUIRED: &str = "STAFF_REQUIRED";
pub const CODE_PERMISSION_DENIED: &str = "PERMISSION_DENIED";

// Tenant errors
pub const CODE_TENANT_NOT_FOUND: &str = "TENANT_NOT_FOUND";

// User errors
pub const CODE_USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const CODE_EMAIL_EXISTS: &str = "EMAIL_EXISTS";
pub const CODE_INVALID_MANAGER: &str = "INVALID_MANAGER";
pub const CODE_INVALID_SUBORDINATE: &str = "INVALID_SUBORDINATE";

// Password errors
pub const CODE_WRONG_PASSWORD: &str = "WRONG_PASSWORD";
pub const CODE_PASSWORD_MISMATCH: &str = "PASSWORD_MISMATCH";
pub const CODE_RESET_TOKEN_INVALID: &str = "RESET_TOKEN_INVALID";

// Role errors
pub const CODE_ROLE_NOT_FOUND: &str = "ROLE_NOT_FOUND";
pub const CODE_ROLE_EXISTS: &str = "ROLE_EXISTS";
pub const CODE_ROLE_PROTECTED: &str = "ROLE_PROTECTED";
pub const CODE_ROLE_IN_USE: &str = "ROLE_IN_USE";
pub const CODE_UNKNOWN_PERMISSION: &str = "UNKNOWN_PERMISSION";

// Contact errors
pub const CODE_CONTACT_NOT_FOUND: &str = "CONTACT_NOT_FOUND";
pub const CODE_CONTACT_LOCKED_BY_OTHER: &str = "CONTACT_LOCKED_BY_OTHER";
pub const CODE_CONTACT_ALREADY_LOCKED: &str = "CONTACT_ALREADY_LOCKED";
pub const CODE_CONTACT_ALREADY_UNLOCKED: &str = "CONTACT_ALREADY_UNLOCKED";
pub const CODE_CUSTOMER_NOT_LOCKABLE: &str = "CUSTOMER_NOT_LOCKABLE";
pub const CODE_CONTACT_COOLDOWN: &str = "CONTACT_COOLDOWN";
pub const CODE_PROSPECT_LIMIT_REACHED: &str = "PROSPECT_LIMIT_REACHED";
pub const CODE_ASSOCIATE_NOT_FOUND: &str = "ASSOCIATE_NOT_FOUND";
pub const CODE_LAST_ASSOCIATE: &str = "LAST_ASSOCIATE";

// GoToConnect errors
pub const CODE_INTEGRATION_NOT_CONFIGURED: &str = "INTEGRATION_NOT_CONFIGURED";
pub const CODE_GOTO_NOT_CONNECTED: &str = "GOTO_NOT_CONNECTED";
pub const CODE_GOTO_LINE_MISSING: &str = "GOTO_LINE_MISSING";
pub const CODE_UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";

// Generic errors
pub const CODE_BAD_REQUEST: &str = "BAD_REQUEST";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_CONFLICT: &str = "CONFLICT";
pub const CODE_INTERNAL_ERROR: &str = "INTERNAL_ERROR";
