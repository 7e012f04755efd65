//! Error types for pure console operations

use thiserror::Error;

/// Draft validation errors, raised before anything is sent to the API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: &'static str },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// A persisted session token that cannot be turned back into an identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityParseError {
    #[error("Malformed session token: {0}")]
    Malformed(String),

    #[error("Session token has no role")]
    MissingRole,

    #[error("Session token has unknown role: {0}")]
    UnknownRole(String),
}

/// Rejected filter configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    #[error("Range filter on non-numeric field: {0}")]
    RangeOnNonNumeric(String),
}
