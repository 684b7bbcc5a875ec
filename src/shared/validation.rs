//! Input validation rules for registration and login.
//!
//! Each checker returns `Ok(())` or a [`SharedError`] that names the field,
//! so handlers can forward it as a `400 Bad Request` unchanged.

use regex::Regex;

use crate::shared::error::SharedError;

/// Minimum number of characters a password must have.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Special characters accepted (and required) in passwords.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Normalize an email for lookup and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a username for lookup and uniqueness checks.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Basic email shape check: `local@domain.tld`, no whitespace, one `@`.
pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Password strength check.
///
/// At least [`MIN_PASSWORD_LEN`] characters drawn from letters, digits and
/// [`PASSWORD_SPECIALS`], with at least one of each: lowercase, uppercase,
/// digit, special.
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return false;
    }

    let is_special = |c: char| PASSWORD_SPECIALS.contains(c);
    if !password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || is_special(c))
    {
        return false;
    }

    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(is_special)
}

/// Username format check.
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

/// Reject the request when any of the given values is blank.
pub fn require_non_blank(values: &[&str]) -> Result<(), SharedError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(SharedError::missing("All fields are required"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), SharedError> {
    if !is_valid_email(email) {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if !is_strong_password(password) {
        return Err(SharedError::validation(
            "password",
            format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long, contain an uppercase letter, a lowercase letter, a number, and a special character ({PASSWORD_SPECIALS})"
            ),
        ));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), SharedError> {
    if !is_valid_username(username) {
        return Err(SharedError::validation(
            "username",
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    Ok(())
}
