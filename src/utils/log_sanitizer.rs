//! Masking of personal data and credentials before they reach the logs.

/// Mask an email address, keeping up to three leading characters and the domain.
///
/// ```ignore
/// assert_eq!(mask_email("dana@example.com"), "dan***@example.com");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}***@{}", leading(local, 3), domain),
        None => format!("{}***", leading(email, 3)),
    }
}

/// Mask an OAuth client id or token, keeping only its first four characters.
pub fn mask_secret(secret: &str) -> String {
    format!("{}***", leading(secret, 4))
}

fn leading(value: &str, count: usize) -> &str {
    match value.char_indices().nth(count) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("dana@example.com"), "dan***@example.com");
        assert_eq!(mask_email("ab@test.org"), "ab***@test.org");
        assert_eq!(mask_email("notanemail"), "not***");
    }

    #[test]
    fn test_mask_email_multibyte() {
        assert_eq!(mask_email("ünïcødé@example.com"), "ünï***@example.com");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdef123456"), "abcd***");
        assert_eq!(mask_secret("ab"), "ab***");
    }
}
