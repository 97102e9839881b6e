//! Common validation utilities and helpers.

use validator::{ValidationError, ValidationErrors};

use crate::constants::{
    is_known_permission, CODE_PASSWORD_MISMATCH, CODE_UNKNOWN_PERMISSION, ERR_PASSWORD_MISMATCH,
};
use crate::errors::ApiError;

/// Convert validator errors to ApiError::ValidationError.
///
/// # Example
/// ```ignore
/// body.validate().map_err(validation_errors_to_api_error)?;
/// ```
pub fn validation_errors_to_api_error(e: ValidationErrors) -> ApiError {
    let mut errors: Vec<String> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .clone()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field))
            })
        })
        .collect();
    errors.sort();
    ApiError::validation(errors)
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() {
        return Ok(());
    }
    let mut error = ValidationError::new("blank");
    error.message = Some("Value must not be blank".into());
    Err(error)
}

/// Validate that password confirmation matches the new password.
pub fn validate_password_match(new_password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if new_password != confirm_password {
        return Err(ApiError::bad_request(CODE_PASSWORD_MISMATCH, ERR_PASSWORD_MISMATCH));
    }
    Ok(())
}

/// Parse a comma separated list of permission codenames.
///
/// Blank entries are skipped and duplicates collapse; any unknown codename
/// rejects the whole list.
pub fn parse_permissions(raw: &str) -> Result<Vec<String>, ApiError> {
    let mut permissions: Vec<String> = Vec::new();
    for codename in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !is_known_permission(codename) {
            return Err(ApiError::bad_request(
                CODE_UNKNOWN_PERMISSION,
                format!("Unknown permission: {}", codename),
            ));
        }
        if !permissions.iter().any(|p| p == codename) {
            permissions.push(codename.to_string());
        }
    }
    Ok(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoginRequest;
    use validator::Validate;

    #[test]
    fn test_validation_errors_are_collected() {
        let req = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let err = validation_errors_to_api_error(req.validate().unwrap_err());
        match err {
            ApiError::ValidationError { errors, .. } => {
                assert_eq!(errors, vec!["Invalid email format", "Password is required"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Acme").is_ok());
        assert!(validate_not_blank("  Acme ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t\n ").is_err());
    }

    #[test]
    fn test_password_match() {
        assert!(validate_password_match("Secret#123", "Secret#123").is_ok());
        let err = validate_password_match("Secret#123", "Secret#124").unwrap_err();
        assert_eq!(err.code(), CODE_PASSWORD_MISMATCH);
    }

    #[test]
    fn test_parse_permissions() {
        let perms = parse_permissions(" view_contact, add_contactnote,,view_contact ").unwrap();
        assert_eq!(perms, vec!["view_contact", "add_contactnote"]);
        assert!(parse_permissions("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_permissions_rejects_unknown() {
        let err = parse_permissions("view_contact,fly_plane").unwrap_err();
        assert_eq!(err.code(), CODE_UNKNOWN_PERMISSION);
        assert!(err.to_string().contains("fly_plane"));
    }
}
