use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Loose email shape: non-space, `@`, non-space, `.`, non-space.
///
/// Deliberately unanchored: any substring match is accepted.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Reasons a login attempt is refused before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill out all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Check whether an address looks like an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validate the login form
///
/// Values are checked exactly as entered. Empty fields are reported
/// before a malformed address.
pub fn validate_login(name: &str, location: &str, email: &str) -> Result<(), ValidationError> {
    if name.is_empty() || location.is_empty() || email.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}
