//! Portal routes and the post-authentication redirect policy.

pub mod guard;

pub use guard::{AuthGuard, GuardDecision, Section};

use std::fmt;

use crate::models::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    /// Neutral page for authenticated users that reached a section they may not enter.
    Landing,
    AdminDashboard,
    AdminUsers,
    PosterDashboard,
    PosterPostings,
    SeekerDashboard,
    SeekerSearch,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/auth/login",
            Route::Register => "/auth/register",
            Route::Landing => "/auth/landing",
            Route::AdminDashboard => "/admin/dashboard",
            Route::AdminUsers => "/admin/users",
            Route::PosterDashboard => "/poster/dashboard",
            Route::PosterPostings => "/poster/postings",
            Route::SeekerDashboard => "/seeker/dashboard",
            Route::SeekerSearch => "/seeker/search",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Landing section for a role.
pub fn landing_for(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard,
        Role::Offerer => Route::PosterDashboard,
        Role::Seeker => Route::SeekerDashboard,
        Role::Other => Route::Root,
    }
}

/// Where to send the browser once a login or registration completes.
pub fn landing_after_auth(user: Option<&User>) -> Route {
    match user {
        Some(user) => landing_for(user.role),
        None => Route::Root,
    }
}
