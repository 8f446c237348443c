//! Error codes for the geo registry API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Field validation failed
    ValidationError,
    /// Malformed request (JSON, query string, path)
    BadRequest,
    /// Request body over the accepted size
    PayloadTooLarge,

    // Resource Not Found
    CountryNotFound,
    StateNotFound,
    CityNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    DuplicateCountryCode,
    DuplicateStateCode,
    DuplicateCityCode,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,

    // Database Constraint Violations
    /// Unique constraint violation (SQLSTATE 23505)
    UniqueViolation,
    /// Foreign key constraint violation (SQLSTATE 23503)
    FkViolation,
    /// Check constraint violation (SQLSTATE 23514)
    CheckViolation,
    /// Record not found (DB-driven not-found)
    RecordNotFound,

    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",

            Self::CountryNotFound => "COUNTRY_NOT_FOUND",
            Self::StateNotFound => "STATE_NOT_FOUND",
            Self::CityNotFound => "CITY_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::DuplicateCountryCode => "DUPLICATE_COUNTRY_CODE",
            Self::DuplicateStateCode => "DUPLICATE_STATE_CODE",
            Self::DuplicateCityCode => "DUPLICATE_CITY_CODE",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",

            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::PayloadTooLarge,
        ErrorCode::CountryNotFound,
        ErrorCode::StateNotFound,
        ErrorCode::CityNotFound,
        ErrorCode::NotFound,
        ErrorCode::DuplicateCountryCode,
        ErrorCode::DuplicateStateCode,
        ErrorCode::DuplicateCityCode,
        ErrorCode::Conflict,
        ErrorCode::DbError,
        ErrorCode::DbUnavailable,
        ErrorCode::DbTimeout,
        ErrorCode::UniqueViolation,
        ErrorCode::FkViolation,
        ErrorCode::CheckViolation,
        ErrorCode::RecordNotFound,
        ErrorCode::Internal,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::BadRequest.as_str(), "BAD_REQUEST");
        assert_eq!(ErrorCode::CountryNotFound.as_str(), "COUNTRY_NOT_FOUND");
        assert_eq!(ErrorCode::DuplicateCityCode.as_str(), "DUPLICATE_CITY_CODE");
        assert_eq!(ErrorCode::FkViolation.as_str(), "FK_VIOLATION");
        assert_eq!(ErrorCode::DbUnavailable.as_str(), "DB_UNAVAILABLE");
    }

    #[test]
    fn codes_are_unique_screaming_snake() {
        let mut seen = HashSet::new();
        for code in ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate code {s}");
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{s}");
        }
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::StateNotFound), "STATE_NOT_FOUND");
        assert_eq!(format!("{}", ErrorCode::CheckViolation), "CHECK_VIOLATION");
    }
}
