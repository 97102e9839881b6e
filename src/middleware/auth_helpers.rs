//! Authentication and authorization helper functions.
//!
//! Handlers call `require_auth` for the claims, resolve the caller through
//! `UserService::current_user`, then gate the action with one of the checks
//! below. Each check fails with the status the endpoint family uses for a
//! denied caller.

use actix_web::HttpRequest;
use log::warn;

use crate::constants::{
    CODE_AUTH_REQUIRED, CODE_FORBIDDEN, CODE_NOT_FOUND, CODE_PERMISSION_DENIED,
    CODE_STAFF_REQUIRED, ERR_AUTH_REQUIRED, ERR_NOT_FOUND, ERR_STAFF_ONLY, ERR_UNAUTHORIZED,
};
use crate::errors::ApiError;
use crate::models::{Claims, CurrentUser};

use super::RequestExt;

/// Extract claims from request or return Unauthorized error.
///
/// # Example
/// ```ignore
/// let claims = require_auth(&req)?;
/// ```
pub fn require_auth(req: &HttpRequest) -> Result<Claims, ApiError> {
    req.get_claims().ok_or_else(|| {
        warn!("Failed to get claims from request");
        ApiError::unauthorized(CODE_AUTH_REQUIRED, ERR_AUTH_REQUIRED)
    })
}

/// Staff (or superuser) only; 403 otherwise.
pub fn require_staff(user: &CurrentUser) -> Result<(), ApiError> {
    if !user.is_staff() {
        warn!("Non-staff user {} attempted a staff action", user.id());
        return Err(ApiError::forbidden(CODE_STAFF_REQUIRED, ERR_STAFF_ONLY));
    }
    Ok(())
}

/// Staff bypass; anyone else needs `codename` in their role. 401 otherwise.
pub fn require_perm(user: &CurrentUser, codename: &str) -> Result<(), ApiError> {
    if user.is_staff() || user.has_perm(codename) {
        return Ok(());
    }
    warn!("User {} lacks permission {}", user.id(), codename);
    Err(ApiError::unauthorized(CODE_PERMISSION_DENIED, ERR_UNAUTHORIZED))
}

/// Strict permission check without the staff bypass; 403 otherwise.
pub fn require_model_perm(user: &CurrentUser, codename: &str) -> Result<(), ApiError> {
    if user.has_perm(codename) {
        return Ok(());
    }
    warn!("User {} lacks permission {}", user.id(), codename);
    Err(ApiError::forbidden(CODE_FORBIDDEN, ERR_UNAUTHORIZED))
}

/// Profile endpoints hide what the caller may not touch behind a 404.
pub fn not_found_unless(allowed: bool) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::not_found(CODE_NOT_FOUND, ERR_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PERM_DELETE_CONTACT, PERM_VIEW_ROLE};
    use crate::models::user::fixtures::profile;
    use crate::models::Role;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use mongodb::bson::oid::ObjectId;

    fn caller(is_staff: bool, permissions: Vec<String>) -> CurrentUser {
        let tenant = ObjectId::new();
        let mut p = profile(tenant, "Sam", "Lee");
        p.is_staff = is_staff;
        CurrentUser {
            profile: p,
            role: Some(Role {
                id: ObjectId::new(),
                tenant_id: tenant,
                name: "Sales".to_string(),
                permissions,
                created_at: mongodb::bson::DateTime::now(),
            }),
        }
    }

    #[test]
    fn test_require_staff() {
        assert!(require_staff(&caller(true, vec![])).is_ok());
        let err = require_staff(&caller(false, vec![])).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_require_perm_staff_bypass() {
        assert!(require_perm(&caller(true, vec![]), PERM_VIEW_ROLE).is_ok());
        assert!(require_perm(&caller(false, vec![PERM_VIEW_ROLE.into()]), PERM_VIEW_ROLE).is_ok());
        let err = require_perm(&caller(false, vec![]), PERM_VIEW_ROLE).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_model_perm_has_no_staff_bypass() {
        let err = require_model_perm(&caller(true, vec![]), PERM_DELETE_CONTACT).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(require_model_perm(
            &caller(false, vec![PERM_DELETE_CONTACT.into()]),
            PERM_DELETE_CONTACT
        )
        .is_ok());
    }

    #[test]
    fn test_not_found_unless() {
        assert!(not_found_unless(true).is_ok());
        assert_eq!(
            not_found_unless(false).unwrap_err().status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
