//! Data models organized by type.

pub mod claims;
pub mod contact;
pub mod current_user;
pub mod gotoconnect;
pub mod password_reset;
pub mod requests;
pub mod responses;
pub mod role;
pub mod tenant;
pub mod user;

pub use claims::*;
pub use contact::*;
pub use current_user::*;
pub use gotoconnect::*;
pub use password_reset::*;
pub use requests::*;
pub use responses::*;
pub use role::*;
pub use tenant::*;
pub use user::*;
