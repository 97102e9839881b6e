use validator::ValidationError;

/// US state codes are two uppercase letters.
pub fn validate_state_code(state: &str) -> Result<(), ValidationError> {
    if state.len() == 2 && state.chars().all(|c| c.is_ascii_uppercase()) {
        return Ok(());
    }
    let mut error = ValidationError::new("invalid_state");
    error.message = Some("State must be a two letter code".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code() {
        assert!(validate_state_code("GA").is_ok());
        assert!(validate_state_code("ga").is_err());
        assert!(validate_state_code("GEO").is_err());
        assert!(validate_state_code("").is_err());
    }
}
