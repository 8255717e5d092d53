use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Serialize;

use crate::models::User;
use crate::routing::{landing_after_auth, Route};
use crate::AppState;

pub async fn health_check() -> &'static str {
    "OK"
}

/// `/` and unknown paths both go to the landing page.
pub async fn index() -> impl IntoResponse {
    Redirect::to(Route::Landing.path())
}

#[derive(Serialize)]
pub struct LandingView {
    pub authenticated: bool,
    pub user: Option<User>,
    /// Section the current identity belongs in, or `/` without one.
    pub home: &'static str,
    pub login: &'static str,
    pub register: &'static str,
}

pub async fn landing(State(state): State<AppState>) -> Json<LandingView> {
    let user = state.sessions.current();
    Json(LandingView {
        authenticated: user.is_some(),
        home: landing_after_auth(user.as_ref()).path(),
        user,
        login: Route::Login.path(),
        register: Route::Register.path(),
    })
}
