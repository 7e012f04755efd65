//! Formation client: REST API access, configuration and scoped storage.

pub mod api_client;
pub mod config;
pub mod storage;
pub mod telemetry;
pub mod traits;

pub use api_client::{ApiClientError, RestClient};
pub use config::{
    ClientConfig, ConfigError, LogFormat, LoggingConfig, SessionConfig, DEFAULT_STORAGE_KEY,
};
pub use storage::{FileStorage, MemoryStorage, ScopedStorage, StorageError};
pub use telemetry::{init_tracing, TelemetryError};
pub use traits::{ActivityApi, AuthApi, EntityApi};
