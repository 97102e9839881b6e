//! Success message constants used throughout the application.

// Authentication messages
pub const MSG_LOGIN_SUCCESS: &str = "Login successful";
pub const MSG_LOGOUT_SUCCESS: &str = "Logout successful";

// Tenant messages
pub const MSG_TENANT_FOUND: &str = "Tenant found";
pub const MSG_TENANT_CREATED: &str = "Tenant created";
pub const MSG_TENANT_UPDATED: &str = "Tenant updated";
pub const MSG_TENANT_DELETED: &str = "Tenant deleted";

// Profile messages
pub const MSG_USER_FOUND: &str = "User found";
pub const MSG_USER_CREATED: &str = "User created";
pub const MSG_USER_PROFILE_RETRIEVED: &str = "User profile retrieved";
pub const MSG_USER_UPDATED: &str = "User profile updated successfully";
pub const MSG_PASSWORD_UPDATED: &str = "Updated password";
pub const MSG_ROLE_ASSIGNED: &str = "Updated role";
pub const MSG_MANAGER_ASSIGNED: &str = "Assigned to a manager";
pub const MSG_NOTE_ADDED: &str = "Note added";
pub const MSG_PASSWORD_RESET_REQUESTED: &str =
    "If the address is registered, a password reset link has been sent";
pub const MSG_PASSWORD_RESET_TOKEN_VALID: &str = "Token is valid";
pub const MSG_PASSWORD_RESET_DONE: &str = "Password has been reset";

// Role messages
pub const MSG_ROLES: &str = "Roles";
pub const MSG_ROLE_FOUND: &str = "Role found";
pub const MSG_ROLE_CREATED: &str = "Role created";
pub const MSG_ROLE_UPDATED: &str = "Role updated";
pub const MSG_ROLE_DELETED: &str = "Role deleted";

// Contact messages
pub const MSG_CONTACT_FOUND: &str = "Contact found";
pub const MSG_CONTACT_CREATED: &str = "Contact created";
pub const MSG_CONTACT_UPDATED: &str = "Contact updated";
pub const MSG_CONTACT_DELETED: &str = "Contact deleted";
pub const MSG_CONTACT_LOCKED: &str = "Successfully locked contact";
pub const MSG_CONTACT_UNLOCKED: &str = "Successfully unlocked contact";
pub const MSG_CONVERTED_TO_CUSTOMER: &str = "Converted to customer";
pub const MSG_CONVERTED_TO_PROSPECT: &str = "Converted to prospect";
pub const MSG_CONTACT_NOTE_ADDED: &str = "Added note";
pub const MSG_CONTACT_NOTES: &str = "Contact notes";
pub const MSG_CONTACT_TIMELINE: &str = "Contact timeline";
pub const MSG_ASSOCIATES: &str = "Contact associates";
pub const MSG_ASSOCIATE_ADDED: &str = "Contact associate added";
pub const MSG_ASSOCIATE_DELETED: &str = "Contact associate deleted";

// GoToConnect messages
pub const MSG_GOTO_INTEGRATION_ADDED: &str = "Added integration to GoToConnect";
pub const MSG_GOTO_CONNECTED: &str = "Connected to GoToConnect";
pub const MSG_GOTO_LINE_UPDATED: &str = "GoToConnect line updated";
pub const MSG_GOTO_CALL_PLACED: &str = "Call initiated";
