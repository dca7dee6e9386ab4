use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use invoicey_backend::client::HttpBackendClient;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    backend: HttpBackendClient,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub backend: HealthCheck,
    pub checked_at: String,
}

pub fn router(backend: HttpBackendClient) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { backend })
}

/// Serve the health endpoint on the host part of `bind_address` at `port`.
pub async fn spawn(
    bind_address: &str,
    port: u16,
    backend: HttpBackendClient,
) -> std::io::Result<()> {
    let host = bind_address.rsplit_once(':').map(|(host, _)| host).unwrap_or(bind_address);
    let address = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(backend)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let backend = backend_check(&state.backend).await;
    let ready = backend.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "invoicey-server runtime initialized".to_string(),
        },
        backend,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// Any HTTP response counts as reachable, auth failures included. The probe
/// is about connectivity, not credentials.
async fn backend_check(backend: &HttpBackendClient) -> HealthCheck {
    match backend.ping().await {
        Ok(status) => HealthCheck {
            status: "ready",
            detail: format!("backend responded with status {status}"),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("backend unreachable: {error}") }
        }
    }
}
