//! Routes, the role-based route guard, and per-area sections.

use crate::session::SessionState;
use formation_core::{EntityKind, Identity, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Root,
    Login,
    User,
    Manager,
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::User => "/user",
            Route::Manager => "/manager",
            Route::Admin => "/admin",
        }
    }

    /// Resolve a location path. Anything unrecognised falls back to `/`.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "/login" => Route::Login,
            "/user" => Route::User,
            "/manager" => Route::Manager,
            "/admin" => Route::Admin,
            _ => Route::Root,
        }
    }

    /// Roles allowed to render this route; `None` for public routes.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Root | Route::Login => None,
            Route::User => Some(&[Role::User, Role::Admin]),
            Route::Manager => Some(&[Role::Manager, Role::Admin]),
            Route::Admin => Some(&[Role::Admin]),
        }
    }

    pub fn is_protected(&self) -> bool {
        self.allowed_roles().is_some()
    }

    /// Sidebar sections of an area route.
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Route::Root | Route::Login => &[],
            Route::User => &[
                Section::Home,
                Section::Trainings,
                Section::Trainers,
                Section::Participants,
            ],
            Route::Manager => &[Section::Home, Section::Statistics, Section::Notifications],
            Route::Admin => &[
                Section::Home,
                Section::Trainings,
                Section::Trainers,
                Section::Participants,
                Section::Users,
            ],
        }
    }
}

/// Landing area for a role.
pub fn home_route(role: Role) -> Route {
    match role {
        Role::User => Route::User,
        Role::Manager => Route::Manager,
        Role::Admin => Route::Admin,
    }
}

pub fn can_access(route: Route, identity: Option<&Identity>) -> bool {
    match route.allowed_roles() {
        None => true,
        Some(roles) => identity.is_some_and(|identity| roles.contains(&identity.role)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session restore still running; show a loading indicator.
    Pending,
    Render(Route),
    Redirect(Route),
}

/// Decide what to show for `route` given the session state.
///
/// Unauthenticated visitors are sent to the login screen. Authenticated
/// users visiting `/`, `/login`, or an area their role may not enter are
/// sent to their home area.
pub fn guard(route: Route, session: &SessionState) -> RouteDecision {
    match session {
        SessionState::Authenticating => RouteDecision::Pending,
        SessionState::Unauthenticated => match route {
            Route::Login => RouteDecision::Render(Route::Login),
            _ => RouteDecision::Redirect(Route::Login),
        },
        SessionState::Authenticated(identity) => {
            let home = home_route(identity.role);
            match route {
                Route::Root | Route::Login => RouteDecision::Redirect(home),
                route if can_access(route, Some(identity)) => RouteDecision::Render(route),
                _ => RouteDecision::Redirect(home),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Home,
    Trainings,
    Trainers,
    Participants,
    Users,
    Statistics,
    Notifications,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Trainings => "Trainings",
            Section::Trainers => "Trainers",
            Section::Participants => "Participants",
            Section::Users => "Users",
            Section::Statistics => "Statistics",
            Section::Notifications => "Notifications",
        }
    }

    /// Entity managed by this section's CRUD screen, if any.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            Section::Trainings => Some(EntityKind::Trainings),
            Section::Trainers => Some(EntityKind::Trainers),
            Section::Participants => Some(EntityKind::Participants),
            Section::Users => Some(EntityKind::Users),
            Section::Home | Section::Statistics | Section::Notifications => None,
        }
    }

    /// Next section within `route`, wrapping around.
    pub fn next_in(&self, route: Route) -> Section {
        let sections = route.sections();
        match sections.iter().position(|s| s == self) {
            Some(idx) => sections[(idx + 1) % sections.len()],
            None => sections.first().copied().unwrap_or(Section::Home),
        }
    }

    pub fn previous_in(&self, route: Route) -> Section {
        let sections = route.sections();
        match sections.iter().position(|s| s == self) {
            Some(0) => sections[sections.len() - 1],
            Some(idx) => sections[idx - 1],
            None => sections.first().copied().unwrap_or(Section::Home),
        }
    }
}
