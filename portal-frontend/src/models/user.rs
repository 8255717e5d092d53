use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::routing::Route;

/// Marketplace role. Decides which portal sections an identity may enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    /// Job poster.
    Offerer,
    /// Job applicant.
    Seeker,
    /// Any role string the backend sends that the portal does not know.
    /// Such an identity can sign in but enters no section.
    #[serde(other)]
    Other,
}

impl Role {
    /// Roles the portal has sections for.
    pub const KNOWN: [Role; 3] = [Role::Admin, Role::Offerer, Role::Seeker];

    /// Roles a visitor may pick for themselves at registration.
    pub const SELF_SERVICE: [Role; 2] = [Role::Offerer, Role::Seeker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Offerer => "OFFERER",
            Role::Seeker => "SEEKER",
            Role::Other => "OTHER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Offerer => "Job poster",
            Role::Seeker => "Job seeker",
            Role::Other => "Other",
        }
    }

    pub fn is_self_service(&self) -> bool {
        Role::SELF_SERVICE.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity as returned by the backend and persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_false")]
    pub active: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Identity of the request, placed in request extensions by the section guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to(Route::Login.path()).into_response())
    }
}
