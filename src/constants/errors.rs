//! Error message constants used throughout the application.

// Authentication errors
pub const ERR_AUTH_REQUIRED: &str = "Authentication required";
pub const ERR_INVALID_AUTH_HEADER: &str = "Missing or invalid authorization header";
pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";
pub const ERR_TOKEN_REVOKED: &str = "Token has been revoked";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERR_ACCOUNT_DEACTIVATED: &str = "Account is deactivated";

// Authorization errors
pub const ERR_UNAUTHORIZED: &str = "Unauthorized";
pub const ERR_STAFF_ONLY: &str = "Only staff members can perform this action";
pub const ERR_NOT_FOUND: &str = "Not Found";

// Tenant errors
pub const ERR_TENANT_NOT_FOUND: &str = "Tenant not found";
pub const ERR_SUBDOMAIN_EXISTS: &str = "A tenant with this subdomain prefix already exists";

// User errors
pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_INVALID_ID: &str = "Invalid ID format";
pub const ERR_EMAIL_IN_USE: &str = "Email already in use";
pub const ERR_FAILED_FETCH_USER: &str = "Failed to fetch updated user";
pub const ERR_MANAGER_ROLE_REQUIRED: &str =
    "Only users with Manager role can be assigned as managers";
pub const ERR_SALES_ROLE_REQUIRED: &str = "Managers can only be assigned to sales users";

// Password errors
pub const ERR_PASSWORD_MISMATCH: &str = "Your new password did not match";
pub const ERR_WRONG_PASSWORD: &str = "Your old password was incorrect. Please enter it again";
pub const ERR_WEAK_PASSWORD: &str =
    "Password must contain at least one uppercase, lowercase, digit, and special character";
pub const ERR_RESET_TOKEN_INVALID: &str = "The password reset token is invalid or has expired";

// Role errors
pub const ERR_ROLE_NOT_FOUND: &str = "Role not found";
pub const ERR_ROLE_EXISTS: &str = "Role already exists";
pub const ERR_CANNOT_UPDATE_ADMIN_ROLE: &str = "Cannot update admin role";
pub const ERR_CANNOT_DELETE_DEFAULT_ROLES: &str = "Cannot delete default roles";
pub const ERR_ROLE_IN_USE: &str = "Role is still assigned to users";

// Contact errors
pub const ERR_CONTACT_NOT_FOUND: &str = "Contact not found";
pub const ERR_CONTACT_LOCKED_BY_OTHER: &str = "Contact is locked by another user";
pub const ERR_CONTACT_EXISTS: &str = "A contact with this name already exists";
pub const ERR_CONTACT_MODIFIED: &str = "Contact was modified by another request, try again";
pub const ERR_CONTACT_ALREADY_LOCKED: &str = "Contact is already locked!";
pub const ERR_CONTACT_ALREADY_UNLOCKED: &str = "Contact is already unlocked!";
pub const ERR_CUSTOMER_NOT_LOCKABLE: &str = "Customers cannot be locked!";
pub const ERR_PROSPECT_LIMIT_REACHED: &str = "Max number of prospects locked. Cannot lock more!";
pub const ERR_ONLY_OWNER_DEMOTES_CUSTOMER: &str =
    "Only the owning user or an administrator can convert a customer back to a prospect";
pub const ERR_ASSOCIATE_NOT_FOUND: &str = "Contact associate not found";
pub const ERR_LAST_ASSOCIATE: &str = "A contact must keep at least one associate";
pub const ERR_ASSOCIATE_EXISTS: &str = "An associate with this phone number or email already exists";

// GoToConnect errors
pub const ERR_GOTO_CLIENT_ID_MISSING: &str = "Update GoToConnect Integration: Add client id";
pub const ERR_GOTO_CLIENT_SECRET_MISSING: &str =
    "Update GoToConnect Integration: Add client secret";
pub const ERR_GOTO_NOT_LOGGED_IN: &str = "User has not logged into GoToConnect";
pub const ERR_GOTO_LINE_MISSING: &str = "Select a GoToConnect line before placing calls";
pub const ERR_GOTO_STATE_INVALID: &str = "Invalid or expired GoToConnect authorization state";
pub const ERR_GOTO_UPSTREAM: &str = "GoToConnect request failed";
