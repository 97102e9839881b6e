//! Services organized by domain concern.

pub mod auth_service;
pub mod contact_service;
pub mod gotoconnect_client;
pub mod gotoconnect_service;
pub mod lifecycle;
pub mod mailer;
pub mod password_reset_service;
pub mod role_service;
pub mod scheduler;
pub mod tenant_service;
pub mod token_blacklist;
pub mod user_service;

pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use gotoconnect_client::GoToConnectClient;
pub use gotoconnect_service::GoToConnectService;
pub use mailer::Mailer;
pub use password_reset_service::PasswordResetService;
pub use role_service::RoleService;
pub use scheduler::UnlockProspectsJob;
pub use tenant_service::TenantService;
pub use token_blacklist::TokenBlacklist;
pub use user_service::UserService;
