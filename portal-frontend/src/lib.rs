pub mod analytics;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod session;
pub mod startup;

use routing::AuthGuard;
use services::{ApiClient, AuthService, ExtractionCache};
use session::SessionStore;
use std::sync::Arc;

/// Shared application state: the one session of this process and its consumers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub sessions: Arc<SessionStore>,
    pub auth: Arc<AuthService>,
    pub guard: AuthGuard,
    pub extractions: Arc<ExtractionCache>,
}

impl AppState {
    pub fn new(api: Arc<ApiClient>, sessions: Arc<SessionStore>) -> Self {
        Self {
            auth: Arc::new(AuthService::new(api.clone(), sessions.clone())),
            guard: AuthGuard::new(sessions.clone()),
            extractions: Arc::new(ExtractionCache::default()),
            api,
            sessions,
        }
    }
}
