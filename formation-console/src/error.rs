//! Error types for the console state machines.

use formation_client::{ApiClientError, ConfigError, StorageError, TelemetryError};
use formation_core::{EntityId, EntityKind, FilterError, IdentityParseError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Network(#[from] ApiClientError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("{} not found: {id}", .kind.singular())]
    NotFound { kind: EntityKind, id: EntityId },
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Parse(#[from] IdentityParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("Another {operation} is still in progress")]
    Busy { operation: &'static str },
    #[error("No form is open")]
    NoOpenForm,
    /// The screen was unmounted while the request was in flight.
    #[error("Screen unmounted; response ignored")]
    Unmounted,
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
