//! Response models for API endpoints.

pub mod api;
pub mod contact;
pub mod gotoconnect;
pub mod pagination;
pub mod role;
pub mod tenant;
pub mod user;

pub use api::*;
pub use contact::*;
pub use gotoconnect::*;
pub use pagination::*;
pub use role::*;
pub use tenant::*;
pub use user::*;
