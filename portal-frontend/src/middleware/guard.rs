use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::routing::{AuthGuard, Section};
use crate::services::metrics::record_guard_decision;

/// State for [`section_guard`]: which section a nested router belongs to.
#[derive(Clone)]
pub struct SectionGuard {
    pub guard: AuthGuard,
    pub section: Section,
}

impl SectionGuard {
    pub fn new(guard: AuthGuard, section: Section) -> Self {
        Self { guard, section }
    }
}

/// Admits the request into a role section or aborts it with a redirect.
///
/// Admitted requests carry the session's `User` in their extensions.
pub async fn section_guard(
    State(SectionGuard { guard, section }): State<SectionGuard>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let decision = guard.check(section.required_roles());
    record_guard_decision(section.as_str(), decision.label());

    match decision.into_result() {
        Ok(user) => {
            tracing::debug!(section = %section, user_id = user.id, "Section access granted");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(redirect) => {
            tracing::info!(
                section = %section,
                path = %request.uri().path(),
                "Section access denied"
            );
            redirect
        }
    }
}
