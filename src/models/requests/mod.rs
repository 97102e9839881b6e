//! Request models for API endpoints.

pub mod auth;
pub mod contact;
pub mod gotoconnect;
pub mod profile;
pub mod role;
pub mod tenant;

pub use auth::*;
pub use contact::*;
pub use gotoconnect::*;
pub use profile::*;
pub use role::*;
pub use tenant::*;
