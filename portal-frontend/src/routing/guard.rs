use axum::response::{IntoResponse, Redirect, Response};
use std::fmt;
use std::sync::Arc;

use super::Route;
use crate::models::{Role, User};
use crate::session::SessionStore;

/// Role-restricted areas of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Admin,
    Poster,
    Seeker,
}

impl Section {
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Section::Admin => &[Role::Admin],
            Section::Poster => &[Role::Offerer],
            Section::Seeker => &[Role::Seeker],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Admin => "admin",
            Section::Poster => "poster",
            Section::Seeker => "seeker",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Allow(User),
    Redirect(Route),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            GuardDecision::Allow(_) => "allow",
            GuardDecision::Redirect(Route::Login) => "login",
            GuardDecision::Redirect(_) => "landing",
        }
    }

    /// The admitted identity, or the `303 See Other` response that aborts navigation.
    pub fn into_result(self) -> Result<User, Response> {
        match self {
            GuardDecision::Allow(user) => Ok(user),
            GuardDecision::Redirect(route) => Err(Redirect::to(route.path()).into_response()),
        }
    }
}

/// Navigation check against the session as currently loaded. Never calls the backend.
#[derive(Clone)]
pub struct AuthGuard {
    sessions: Arc<SessionStore>,
}

impl AuthGuard {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// An empty `required_roles` admits any authenticated identity.
    pub fn check(&self, required_roles: &[Role]) -> GuardDecision {
        let Some(user) = self.sessions.current() else {
            return GuardDecision::Redirect(Route::Login);
        };

        if !required_roles.is_empty() && !required_roles.contains(&user.role) {
            return GuardDecision::Redirect(Route::Landing);
        }

        GuardDecision::Allow(user)
    }

    pub fn can_activate(&self, required_roles: &[Role]) -> bool {
        self.check(required_roles).is_allowed()
    }
}
