use dotenvy::dotenv;
use portal_core::observability::init_tracing;
use portal_frontend::config::get_configuration;
use portal_frontend::services::ApiClient;
use portal_frontend::session::{FileStorage, MemoryStorage, SessionStorage, SessionStore};
use portal_frontend::startup::build_router;
use portal_frontend::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "portal-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    portal_frontend::services::metrics::init_metrics()
        .map_err(|e| anyhow::anyhow!("Failed to register metrics: {}", e))?;

    let storage: Arc<dyn SessionStorage> = match &configuration.session.storage_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Persisting session to disk");
            Arc::new(FileStorage::new(dir))
        }
        None => {
            info!("No session storage directory configured; session is kept in memory");
            Arc::new(MemoryStorage::default())
        }
    };
    let sessions = Arc::new(SessionStore::initialize(storage));

    let mut changes = sessions.observe();
    tokio::spawn(async move {
        while let Some(session) = changes.recv().await {
            match session {
                Some(user) => info!(user_id = user.id, role = %user.role, "Session active"),
                None => info!("No active session"),
            }
        }
    });

    let api = Arc::new(ApiClient::new(&configuration.backend));
    info!(backend = %api.base_url(), "Using marketplace backend");

    let app = build_router(AppState::new(api, sessions));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting portal-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
