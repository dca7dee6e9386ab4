use std::sync::Arc;

use invoicey_backend::client::HttpBackendClient;
use invoicey_backend::stores::BackendError;
use invoicey_chat::{ChatEngine, EngineSettings};
use invoicey_core::config::AppConfig;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub backend: HttpBackendClient,
    pub engine: Arc<ChatEngine<HttpBackendClient>>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("backend client initialization failed: {0}")]
    BackendClient(#[source] BackendError),
}

/// Wire the backend client and chat engine from an already-loaded config.
/// Config loading stays in `main` so logging can be initialized between the
/// two steps.
pub fn bootstrap(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let backend =
        HttpBackendClient::from_config(&config.backend).map_err(BootstrapError::BackendClient)?;
    let engine =
        Arc::new(ChatEngine::new(backend.clone(), EngineSettings::from_config(&config)));
    info!(
        event_name = "system.bootstrap.engine_ready",
        correlation_id = "bootstrap",
        backend_base_url = %config.backend.base_url,
        "chat engine wired to backend"
    );

    Ok(Application { config, backend, engine })
}
