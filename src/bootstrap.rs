use crate::application::services::GatewayService;
use crate::config::Config;
use crate::domain::ports::retailer_client::RetailerClientFactory;
use crate::domain::ports::session_repository::SessionRepository;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::http::router::{build_router, cors_layer};
use crate::infrastructure::persistence::InMemorySessionRepository;
use crate::infrastructure::providers::HttpRetailerClientFactory;
use axum::Router;
use std::sync::Arc;

pub fn build_app_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    // Fail at startup rather than on the first login if the upstream settings are unusable
    let client_factory = HttpRetailerClientFactory::new(config.upstream.clone());
    client_factory.create_client()?;
    tracing::info!(
        base_url = %config.upstream.base_url,
        store_id = %config.upstream.store_id,
        timeout_secs = config.upstream.timeout.as_secs(),
        "Upstream client factory initialized"
    );

    let session_repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
    tracing::info!("In-memory session store initialized");

    Ok(build_app_state_with(session_repo, Arc::new(client_factory)))
}

/// Assemble the state from explicit backends.
pub fn build_app_state_with(
    session_repo: Arc<dyn SessionRepository>,
    client_factory: Arc<dyn RetailerClientFactory>,
) -> AppState {
    AppState {
        gateway: GatewayService::new(session_repo, client_factory),
    }
}

pub fn build_app(state: AppState, config: &Config) -> Result<Router, Box<dyn std::error::Error>> {
    let cors = cors_layer(&config.cors_allowed_origin)?;
    tracing::info!("CORS allowed origin: {}", config.cors_allowed_origin);
    Ok(build_router(state, cors))
}
