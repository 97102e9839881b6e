//! User and tenant custom validators.

use validator::ValidationError;

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:',.<>?/`~\"\\";

/// Passwords need at least 8 characters with an uppercase letter, a
/// lowercase letter, a digit and a special character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c));

    if strong {
        return Ok(());
    }
    let mut error = ValidationError::new("weak_password");
    error.message = Some(crate::constants::ERR_WEAK_PASSWORD.into());
    Err(error)
}

/// Subdomain prefixes are lowercase letters, digits and inner hyphens.
pub fn validate_subdomain_prefix(prefix: &str) -> Result<(), ValidationError> {
    let valid_chars = prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid_chars && !prefix.starts_with('-') && !prefix.ends_with('-') {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_subdomain_prefix");
    error.message =
        Some("Subdomain prefix may only contain lowercase letters, digits and hyphens".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("SecurePass123!").is_ok());
        assert!(validate_password_strength("Sh0rt!").is_err());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("NoDigitsHere!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }

    #[test]
    fn test_subdomain_prefix() {
        assert!(validate_subdomain_prefix("blue-ridge2").is_ok());
        assert!(validate_subdomain_prefix("Blue").is_err());
        assert!(validate_subdomain_prefix("-edge").is_err());
        assert!(validate_subdomain_prefix("has space").is_err());
    }
}
