use askama::Template;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;

use crate::models::credentials::MIN_PASSWORD_LENGTH;
use crate::models::{LoginRequest, RegisterRequest, Role, User};
use crate::routing::{landing_after_auth, Route};
use crate::services::{AuthError, AuthOperation, AuthOutcome};
use crate::AppState;

const HX_REDIRECT: &str = "hx-redirect";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub register_path: &'static str,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub login_path: &'static str,
    pub roles: &'static [Role],
    pub min_password_length: usize,
}

/// Swapped into the form's `#auth-error` target by HTMX.
#[derive(Template)]
#[template(path = "partials/auth_error.html")]
pub struct AuthErrorTemplate {
    pub message: String,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {
        register_path: Route::Register.path(),
    }
}

pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        login_path: Route::Login.path(),
        roles: &Role::SELF_SERVICE,
        min_password_length: MIN_PASSWORD_LENGTH,
    }
}

#[derive(Serialize)]
pub struct AuthenticatedView {
    pub redirect_to: &'static str,
    pub user: User,
}

pub async fn login_handler(
    State(state): State<AppState>,
    Form(credentials): Form<LoginRequest>,
) -> Response {
    let result = state.auth.login(&credentials).await;
    respond(AuthOperation::Login, result)
}

pub async fn register_handler(
    State(state): State<AppState>,
    Form(registration): Form<RegisterRequest>,
) -> Response {
    let result = state.auth.register(&registration).await;
    respond(AuthOperation::Register, result)
}

pub async fn logout_handler(State(state): State<AppState>) -> Response {
    state.auth.logout();
    state.extractions.clear();
    tracing::info!("User logged out");
    redirect_response(Route::Login.path(), "")
}

#[derive(Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub user: Option<User>,
}

pub async fn session_handler(State(state): State<AppState>) -> Json<SessionView> {
    let user = state.sessions.current();
    Json(SessionView {
        authenticated: user.is_some(),
        user,
    })
}

fn respond(operation: AuthOperation, result: Result<AuthOutcome, AuthError>) -> Response {
    match result {
        Ok(AuthOutcome::Authenticated(user)) => {
            let redirect_to = landing_after_auth(Some(&user)).path();
            redirect_response(redirect_to, Json(AuthenticatedView { redirect_to, user }))
        }
        Ok(AuthOutcome::NoIdentity) => error_fragment(
            StatusCode::UNPROCESSABLE_ENTITY,
            AuthOutcome::rejection_message(operation),
        ),
        Err(e) if e.is_user_error() => {
            error_fragment(StatusCode::UNPROCESSABLE_ENTITY, e.user_message(operation))
        }
        Err(e) => error_fragment(StatusCode::BAD_GATEWAY, e.user_message(operation)),
    }
}

/// HTMX follows `HX-Redirect` after a successful form post.
fn redirect_response(target: &'static str, body: impl IntoResponse) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(HX_REDIRECT, HeaderValue::from_static(target));
    (StatusCode::OK, headers, body).into_response()
}

fn error_fragment(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        AuthErrorTemplate {
            message: message.into(),
        },
    )
        .into_response()
}
