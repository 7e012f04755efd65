//! Session gate
//!
//! Holds the authenticated identity, persists it as a token in scoped
//! storage, and restores it on start-up.

use crate::error::{ConsoleError, ConsoleResult};
use crate::routes::{can_access, Route};
use formation_client::{AuthApi, ScopedStorage, DEFAULT_STORAGE_KEY};
use formation_core::{Credentials, Identity, Role};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const INVALID_SESSION: &str = "Invalid authentication data. Please log in again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    /// Start-up restore or a login request is in flight.
    Authenticating,
    Authenticated(Identity),
}

pub struct SessionGate<S: ScopedStorage, A: AuthApi> {
    storage: Arc<S>,
    auth: Arc<A>,
    storage_key: String,
    state: SessionState,
    error: Option<String>,
}

impl<S: ScopedStorage, A: AuthApi> SessionGate<S, A> {
    /// A new gate starts in `Authenticating` until [`Self::rehydrate`] runs.
    pub fn new(storage: Arc<S>, auth: Arc<A>) -> Self {
        Self::with_storage_key(storage, auth, DEFAULT_STORAGE_KEY)
    }

    pub fn with_storage_key(storage: Arc<S>, auth: Arc<A>, key: impl Into<String>) -> Self {
        Self {
            storage,
            auth,
            storage_key: key.into(),
            state: SessionState::Authenticating,
            error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// Whether the current identity may render `route`.
    pub fn can_access(&self, route: Route) -> bool {
        can_access(route, self.identity())
    }

    /// Message to show on the login screen.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Restore the identity persisted by a previous login.
    ///
    /// A token that fails to parse is removed from storage and the gate
    /// ends up unauthenticated with an explanatory error.
    pub fn rehydrate(&mut self) -> &SessionState {
        self.state = match self.storage.get(&self.storage_key) {
            Ok(None) => {
                debug!("no persisted session");
                SessionState::Unauthenticated
            }
            Ok(Some(token)) => match Identity::from_token(&token) {
                Ok(identity) => {
                    info!(login = %identity.login, role = %identity.role, "session restored");
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    warn!(error = %e, "discarding invalid session token");
                    self.discard_token();
                    self.error = Some(INVALID_SESSION.to_string());
                    SessionState::Unauthenticated
                }
            },
            Err(e) => {
                error!(error = %e, "failed to read session storage");
                self.error = Some(INVALID_SESSION.to_string());
                SessionState::Unauthenticated
            }
        };
        &self.state
    }

    /// Authenticate and persist the resulting identity.
    ///
    /// The error message is the server's when it sent one, and
    /// [`INVALID_CREDENTIALS`] otherwise.
    pub async fn login(&mut self, credentials: &Credentials) -> ConsoleResult<&Identity> {
        self.state = SessionState::Authenticating;
        self.error = None;

        let identity = match self.auth.authenticate(credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!(login = %credentials.login, error = %e, "login rejected");
                let message = e
                    .server_message()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(INVALID_CREDENTIALS)
                    .to_string();
                return Err(self.fail_login(message));
            }
        };

        let persisted = identity
            .to_token()
            .map_err(|e| e.to_string())
            .and_then(|token| {
                self.storage
                    .set(&self.storage_key, &token)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = persisted {
            error!(error = %e, "failed to persist session token");
            return Err(self.fail_login(LOGIN_FAILED.to_string()));
        }

        info!(login = %identity.login, role = %identity.role, "logged in");
        self.state = SessionState::Authenticated(identity);
        match &self.state {
            SessionState::Authenticated(identity) => Ok(identity),
            _ => Err(ConsoleError::Auth(LOGIN_FAILED.to_string())),
        }
    }

    fn fail_login(&mut self, message: String) -> ConsoleError {
        self.state = SessionState::Unauthenticated;
        self.error = Some(message.clone());
        ConsoleError::Auth(message)
    }

    /// Forget the identity and its persisted token.
    pub fn logout(&mut self) {
        if let Some(identity) = self.identity() {
            info!(login = %identity.login, "logged out");
        }
        self.discard_token();
        self.state = SessionState::Unauthenticated;
        self.error = None;
    }

    fn discard_token(&self) {
        if let Err(e) = self.storage.remove(&self.storage_key) {
            warn!(error = %e, "failed to remove session token");
        }
    }
}
