//! Request validation helpers.

pub mod common;
pub mod contact;
pub mod user;

pub use common::*;
pub use contact::*;
pub use user::*;
