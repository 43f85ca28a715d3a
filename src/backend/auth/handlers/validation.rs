/**
 * Account Field Validation
 *
 * Rules shared by registration and profile updates.
 */

use crate::backend::error::BackendError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Basic email check: one `@` with something on both sides
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

pub fn check_username(username: &str) -> Result<(), BackendError> {
    if !is_valid_username(username) {
        tracing::warn!("Invalid username format: {}", username);
        return Err(BackendError::bad_request(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<(), BackendError> {
    if !is_valid_email(email) {
        tracing::warn!("Invalid email format: {}", email);
        return Err(BackendError::bad_request("Invalid email format"));
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<(), BackendError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(BackendError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("bob_42"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("4lice"));
        assert!(!is_valid_username("alice!"));
        assert!(!is_valid_username(&"a".repeat(31)));
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@example.com"));
        assert!(!is_valid_email("example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@b@c"));
    }

    #[test]
    fn test_password_length() {
        assert!(check_password("password123").is_ok());
        assert!(check_password("short").is_err());
    }
}
