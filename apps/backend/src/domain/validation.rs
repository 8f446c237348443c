//! Field rules shared by the request types.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::DomainError;

pub const NAME_MAX_CHARS: usize = 100;

/// ISO 3166-2 subdivision code, e.g. `JP-13` or `US-CA`.
fn state_code() -> &'static Regex {
    static STATE_CODE: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[A-Z]{2}-[A-Z0-9]{1,3}$").unwrap()
    });
    &STATE_CODE
}

/// JIS X 0402 local government code, e.g. `131016`.
fn city_code() -> &'static Regex {
    static CITY_CODE: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[0-9]{6}$").unwrap()
    });
    &CITY_CODE
}

/// Length check in characters, not bytes.
pub fn char_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len < min || len > max {
        let detail = if min == max {
            format!("{field} must be exactly {min} characters")
        } else {
            format!("{field} must be between {min} and {max} characters")
        };
        return Err(DomainError::field(detail));
    }
    Ok(())
}

pub fn name(value: &str) -> Result<(), DomainError> {
    char_len("name", value, 1, NAME_MAX_CHARS)
}

/// Uppercases an ISO 3166-1 alpha-2 code after checking its length.
pub fn country_code(value: &str) -> Result<String, DomainError> {
    char_len("code", value, 2, 2)?;
    Ok(value.to_uppercase())
}

/// Uppercases and checks an ISO 3166-2 code.
pub fn state_code_normalized(value: &str) -> Result<String, DomainError> {
    char_len("code", value, 1, 10)?;
    let upper = value.to_uppercase();
    if !state_code().is_match(&upper) {
        return Err(DomainError::field(
            "code must be in ISO 3166-2 format (e.g., 'JP-13', 'US-CA')",
        ));
    }
    Ok(upper)
}

pub fn city_code_checked(value: &str) -> Result<(), DomainError> {
    if !city_code().is_match(value) {
        return Err(DomainError::field(
            "code must be a 6-digit number (e.g., '131016' for Minato-ku, Tokyo)",
        ));
    }
    Ok(())
}

pub fn positive_id(field: &str, value: i32) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::field(format!("{field} must be greater than 0")));
    }
    Ok(())
}
