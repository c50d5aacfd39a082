//! Validation error types and shared field rules

use once_cell::sync::Lazy;
use regex::Regex;

/// Validation error for user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field is empty
    #[error("{field} is required")]
    Empty { field: &'static str },

    /// Field is shorter than the allowed minimum
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// String doesn't match required format (e.g., email)
    #[error("{field}: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

/// WHATWG "valid e-mail address" production.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("invalid email regex")
});

/// Check that `value` is a well-formed email address.
pub(crate) fn check_email(value: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must be a valid email address",
        })
    }
}

/// Check that a required field was supplied.
pub(crate) fn check_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

/// Check a minimum length, counted in characters rather than bytes.
pub(crate) fn check_min_len(
    field: &'static str,
    value: &str,
    min: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        Err(ValidationError::TooShort { field, min })
    } else {
        Ok(())
    }
}
