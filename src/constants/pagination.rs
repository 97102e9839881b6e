//! Page window shared by the contact, profile, note and tenant listings.

pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper bound for `per_page`.
pub const MAX_PAGE_SIZE: u64 = 100;
