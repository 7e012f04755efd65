//! Identity types: entity identifiers and the authenticated session identity.

use crate::enums::Role;
use crate::error::IdentityParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Opaque entity identifier assigned by the API on creation.
///
/// The API may hand out integers or strings; both are kept verbatim and
/// compared by value. Identifiers are never synthesised client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(value) => write!(f, "{}", value),
            EntityId::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Int(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Text(value)
    }
}

/// Login form payload for `POST /api/users/auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// The authenticated identity held by the session gate.
///
/// Whatever else the authentication endpoint returns is kept in `extra` so
/// the persisted token round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub login: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    pub fn new(login: impl Into<String>, role: Role) -> Self {
        Self {
            login: login.into(),
            role,
            extra: serde_json::Map::new(),
        }
    }

    /// Parse a persisted session token.
    ///
    /// A token that is not a JSON object, has no `role`, or names a role
    /// outside the closed set is rejected.
    pub fn from_token(token: &str) -> Result<Self, IdentityParseError> {
        let value: serde_json::Value = serde_json::from_str(token)
            .map_err(|e| IdentityParseError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build an identity from an already-decoded JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, IdentityParseError> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(IdentityParseError::Malformed(
                "token is not a JSON object".to_string(),
            ));
        };

        let role = match map.remove("role") {
            Some(serde_json::Value::String(role)) if !role.is_empty() => role
                .parse::<Role>()
                .map_err(|_| IdentityParseError::UnknownRole(role))?,
            Some(serde_json::Value::Null) | None => return Err(IdentityParseError::MissingRole),
            Some(serde_json::Value::String(_)) => return Err(IdentityParseError::MissingRole),
            Some(other) => return Err(IdentityParseError::UnknownRole(other.to_string())),
        };

        let login = match map.remove("login") {
            Some(serde_json::Value::String(login)) => login,
            Some(other) => {
                return Err(IdentityParseError::Malformed(format!(
                    "login must be a string, got {}",
                    other
                )))
            }
            None => String::new(),
        };

        Ok(Self {
            login,
            role,
            extra: map,
        })
    }

    /// Serialize into the token format stored in the scoped storage slot.
    pub fn to_token(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
