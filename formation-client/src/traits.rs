//! Seams between the console state machines and the remote API.
//!
//! The console only talks to the API through these traits so screens and
//! the session gate can run against in-memory doubles.

use crate::api_client::ApiClientError;
use async_trait::async_trait;
use formation_core::{ActivityRecord, Credentials, Entity, EntityId, EntityKind, Identity};

/// CRUD endpoints of one entity collection.
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<E>, ApiClientError>;

    /// Create a record; the API assigns its id.
    async fn create(&self, draft: &E::Draft) -> Result<E, ApiClientError>;

    async fn update(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ApiClientError>;

    async fn delete(&self, id: &EntityId) -> Result<(), ApiClientError>;
}

/// Credential check against the authentication endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, ApiClientError>;
}

/// Recently changed records feeding the dashboards.
#[async_trait]
pub trait ActivityApi: Send + Sync {
    async fn recent_activities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<ActivityRecord>, ApiClientError>;
}
