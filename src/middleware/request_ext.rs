//! Request extension trait for reading what `AuthMiddleware` stored.

use actix_web::HttpMessage;

use crate::models::Claims;

/// Bearer token as received, kept so logout can revoke it.
#[derive(Debug, Clone)]
pub struct RawToken(pub String);

pub trait RequestExt {
    /// Decoded JWT claims, present on authenticated routes.
    fn get_claims(&self) -> Option<Claims>;
    fn get_raw_token(&self) -> Option<String>;
}

impl RequestExt for actix_web::HttpRequest {
    fn get_claims(&self) -> Option<Claims> {
        self.extensions().get::<Claims>().cloned()
    }

    fn get_raw_token(&self) -> Option<String> {
        self.extensions().get::<RawToken>().map(|t| t.0.clone())
    }
}
