//! Process-level wiring: configuration, tracing, the REST client and the
//! session gate, constructed once at start-up.

use crate::controller::CrudController;
use crate::dashboard::RecentActivities;
use crate::error::ConsoleResult;
use crate::routes::{guard, Route, RouteDecision};
use crate::session::SessionGate;
use formation_client::{init_tracing, ClientConfig, FileStorage, RestClient};
use formation_core::Entity;
use std::sync::Arc;
use tracing::info;

pub struct Console {
    config: ClientConfig,
    api: Arc<RestClient>,
    session: SessionGate<FileStorage, RestClient>,
}

impl Console {
    /// Build from an already-loaded configuration. The session is not yet
    /// restored.
    pub fn new(config: ClientConfig) -> ConsoleResult<Self> {
        config.validate()?;
        let api = Arc::new(RestClient::new(&config)?);
        let storage = Arc::new(FileStorage::new(&config.session.storage_path));
        let session =
            SessionGate::with_storage_key(storage, api.clone(), &config.session.storage_key);
        Ok(Self {
            config,
            api,
            session,
        })
    }

    /// Load configuration from `--config` or `FORMATION_CONFIG`, install
    /// tracing, and restore any persisted session.
    pub fn bootstrap() -> ConsoleResult<Self> {
        let config = ClientConfig::load()?;
        init_tracing(&config.logging)?;
        let mut console = Self::new(config)?;
        console.session.rehydrate();
        info!(api = %console.config.api_base_url, "console started");
        Ok(console)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionGate<FileStorage, RestClient> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionGate<FileStorage, RestClient> {
        &mut self.session
    }

    /// Route decision for a location path.
    pub fn navigate(&self, path: &str) -> RouteDecision {
        guard(Route::parse(path), self.session.state())
    }

    /// A fresh controller for one entity screen.
    pub fn screen<E: Entity>(&self) -> CrudController<E, RestClient> {
        CrudController::new(self.api.clone())
    }

    /// Activity feeds for the signed-in role, or `None` when signed out.
    pub async fn recent_activities(&self) -> Option<RecentActivities> {
        let role = self.session.role()?;
        Some(RecentActivities::load(self.api.as_ref(), role).await)
    }
}
