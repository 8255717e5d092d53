use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use portal_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    admin, app,
    auth::{
        login_handler, login_page, logout_handler, register_handler, register_page,
        session_handler,
    },
    metrics::metrics,
    poster, seeker,
};
use crate::middleware::{metrics_middleware, section_guard, SectionGuard};
use crate::routing::Section;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/users", get(admin::users))
        .route("/users/:id/status", put(admin::set_user_status));

    let poster_routes = Router::new()
        .route("/dashboard", get(poster::dashboard))
        .route(
            "/postings",
            get(poster::postings).post(poster::create_posting),
        )
        .route("/postings/upload", post(poster::upload_posting))
        .route("/postings/:id", delete(poster::delete_posting))
        .route("/postings/:id/status", put(poster::set_posting_status))
        .route(
            "/applications/:id/status",
            put(poster::set_application_status),
        );

    let seeker_routes = Router::new()
        .route("/dashboard", get(seeker::dashboard))
        .route("/search", get(seeker::search))
        .route("/jobs/:id/extract", post(seeker::extract))
        .route("/jobs/:id/apply", post(seeker::apply))
        .route("/jobs/:id/extraction.csv", get(seeker::extraction_export));

    Router::new()
        .route("/", get(app::index))
        .route("/health", get(app::health_check))
        .route("/metrics", get(metrics))
        .route("/auth/login", get(login_page).post(login_handler))
        .route("/auth/register", get(register_page).post(register_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/session", get(session_handler))
        .route("/auth/landing", get(app::landing))
        .nest("/admin", guarded(admin_routes, &state, Section::Admin))
        .nest("/poster", guarded(poster_routes, &state, Section::Poster))
        .nest("/seeker", guarded(seeker_routes, &state, Section::Seeker))
        .fallback(app::index)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Puts a section's routes behind the role guard.
fn guarded(routes: Router<AppState>, state: &AppState, section: Section) -> Router<AppState> {
    routes.route_layer(from_fn_with_state(
        SectionGuard::new(state.guard.clone(), section),
        section_guard,
    ))
}
