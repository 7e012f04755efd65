//! Formation console: the state machines behind the training administration
//! console.
//!
//! - [`session::SessionGate`] authenticates and persists the identity
//! - [`routes::guard`] decides which area a visitor may see
//! - [`controller::CrudController`] drives one entity screen
//! - [`dashboard`] builds the activity feed and statistics
//! - [`app::Console`] wires them to the configured REST API

pub mod app;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod liveness;
pub mod notifications;
pub mod routes;
pub mod session;
pub mod store;

pub use app::Console;
pub use controller::{ControllerState, CrudController, FormState};
pub use dashboard::{feed_kinds, format_time_ago, ActivityEntry, RecentActivities, Statistics};
pub use error::{ConsoleError, ConsoleResult};
pub use liveness::Liveness;
pub use notifications::{Notification, NotificationAction, NotificationLevel, Notifications};
pub use routes::{can_access, guard, home_route, Route, RouteDecision, Section};
pub use session::{SessionGate, SessionState, INVALID_CREDENTIALS, INVALID_SESSION, LOGIN_FAILED};
pub use store::EntityStore;
